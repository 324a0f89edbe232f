//! Validation outcome types.
//!
//! Each pipeline stage returns a `StageOutcome`; the pipeline folds those
//! into one `ValidationReport` per transaction.  Reports are never persisted
//! directly; only their outcome reaches the ledger and reputation store, and
//! rejected transactions leave a `RejectionRecord` behind for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{agent::AgentId, transaction::TxId};

/// The number of stages that can reject outright and count toward
/// `ValidationReport::stages_passed`.
pub const COUNTED_STAGES: u8 = 3;

/// What a single validation stage concluded about a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    /// The stage's objective check passed.  Counts toward `stages_passed`.
    Passed,

    /// Hard failure.  The pipeline records `error`, marks the report
    /// invalid, and stops.
    Rejected { error: String },

    /// Soft result.  Optionally adds a warning and, when `invalidate` is
    /// set, flips the report to invalid without stopping the pipeline.
    /// Never counts toward `stages_passed`.
    Advisory {
        warning: Option<String>,
        invalidate: bool,
    },
}

impl StageOutcome {
    /// An advisory outcome with nothing to say.
    pub fn clear() -> Self {
        StageOutcome::Advisory {
            warning: None,
            invalidate: false,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        StageOutcome::Rejected {
            error: error.into(),
        }
    }

    pub fn warn(warning: impl Into<String>) -> Self {
        StageOutcome::Advisory {
            warning: Some(warning.into()),
            invalidate: false,
        }
    }
}

/// The result of running the full pipeline over one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if no stage rejected or invalidated the transaction.
    pub valid: bool,
    /// Hard-failure reasons, in stage order.
    pub errors: Vec<String>,
    /// Advisory findings, in stage order.
    pub warnings: Vec<String>,
    /// How many of the counted stages were reached and passed (0–3).
    pub stages_passed: u8,
}

impl ValidationReport {
    /// A fresh report: valid until a stage says otherwise.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stages_passed: 0,
        }
    }

    /// Share of counted stages passed, scaled to [0, 100].
    ///
    /// This is the `validation_score` fed back into the sender's reputation.
    pub fn validation_score(&self) -> u8 {
        let passed = u32::from(self.stages_passed.min(COUNTED_STAGES));
        (passed * 100 / u32::from(COUNTED_STAGES)) as u8
    }

    /// True if any warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit entry kept for every transaction a validator rejects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub tx_id: TxId,
    pub sender: AgentId,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub rejected_at: DateTime<Utc>,
}

impl RejectionRecord {
    pub fn from_report(tx_id: TxId, sender: AgentId, report: &ValidationReport) -> Self {
        Self {
            tx_id,
            sender,
            errors: report.errors.clone(),
            warnings: report.warnings.clone(),
            rejected_at: Utc::now(),
        }
    }
}
