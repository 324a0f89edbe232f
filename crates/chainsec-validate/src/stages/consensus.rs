//! Consensus stage: advisory comparison with the ledger's current tip.
//!
//! This is not a consensus protocol.  It only tells the caller whether the
//! sender built on the tip this node sees; disagreement never invalidates.

use std::sync::Arc;

use tracing::debug;

use chainsec_contracts::{report::StageOutcome, transaction::Transaction};
use chainsec_core::traits::{ChainView, ValidationStage};

use super::CONSENSUS_PENDING;

pub struct ConsensusStage {
    chain: Arc<dyn ChainView>,
}

impl ConsensusStage {
    pub fn new(chain: Arc<dyn ChainView>) -> Self {
        Self { chain }
    }
}

impl ValidationStage for ConsensusStage {
    fn evaluate(&self, tx: &Transaction) -> StageOutcome {
        let tip = match self.chain.tip_hash() {
            Ok(tip) => tip,
            Err(e) => {
                debug!(error = %e, "tip unavailable for consensus check");
                return StageOutcome::warn(CONSENSUS_PENDING);
            }
        };

        match &tx.block_hash {
            Some(claimed) if *claimed == tip => StageOutcome::clear(),
            claimed => {
                debug!(sender = %tx.sender, ?claimed, tip = %tip, "sender is not on the local tip");
                StageOutcome::warn(CONSENSUS_PENDING)
            }
        }
    }
}
