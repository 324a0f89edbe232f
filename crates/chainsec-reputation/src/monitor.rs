//! Low-performer monitoring over a shared `ReputationStore`.

use std::sync::Arc;

use tracing::{info, warn};

use chainsec_contracts::error::ChainSecResult;

use crate::{record::ReputationSnapshot, store::ReputationStore};

pub const DEFAULT_LOW_PERFORMER_THRESHOLD: u8 = 50;

pub struct ReputationMonitor {
    store: Arc<ReputationStore>,
}

impl ReputationMonitor {
    pub fn new(store: Arc<ReputationStore>) -> Self {
        Self { store }
    }

    /// Snapshots of every known agent scoring strictly below `threshold`,
    /// lowest score first.
    pub fn identify_low_performers(&self, threshold: u8) -> ChainSecResult<Vec<ReputationSnapshot>> {
        let mut low = Vec::new();
        for agent_id in self.store.agents()? {
            let snapshot = self.store.get_reputation(&agent_id)?;
            if snapshot.score < threshold {
                warn!(
                    agent_id = %agent_id,
                    score = snapshot.score,
                    threshold,
                    total_tasks = snapshot.record.total_tasks,
                    "low-performing agent"
                );
                low.push(snapshot);
            }
        }
        low.sort_by_key(|s| s.score);

        info!(threshold, low_performer_count = low.len(), "reputation sweep complete");
        Ok(low)
    }
}
