//! Reputation gate: always the last stage.
//!
//! `score < low` warns and invalidates, `low <= score < medium` warns only.
//! An unreadable score is treated as 0.

use std::sync::Arc;

use tracing::{debug, warn};

use chainsec_contracts::{report::StageOutcome, transaction::Transaction};
use chainsec_core::traits::{ReputationView, ValidationStage};

use super::{LOW_REPUTATION, MEDIUM_REPUTATION};

pub struct ReputationGateStage {
    reputation: Arc<dyn ReputationView>,
    low_threshold: u8,
    medium_threshold: u8,
}

impl ReputationGateStage {
    pub fn new(reputation: Arc<dyn ReputationView>, low_threshold: u8, medium_threshold: u8) -> Self {
        Self {
            reputation,
            low_threshold,
            medium_threshold,
        }
    }
}

impl ValidationStage for ReputationGateStage {
    fn evaluate(&self, tx: &Transaction) -> StageOutcome {
        let score = self.reputation.score(&tx.sender).unwrap_or_else(|e| {
            warn!(sender = %tx.sender, error = %e, "reputation unavailable; treating as 0");
            0
        });

        if score < self.low_threshold {
            debug!(sender = %tx.sender, score, "reputation below low threshold");
            StageOutcome::Advisory {
                warning: Some(LOW_REPUTATION.to_string()),
                invalidate: true,
            }
        } else if score < self.medium_threshold {
            debug!(sender = %tx.sender, score, "reputation below medium threshold");
            StageOutcome::warn(MEDIUM_REPUTATION)
        } else {
            StageOutcome::clear()
        }
    }
}
