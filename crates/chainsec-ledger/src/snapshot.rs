//! Persisted ledger state.
//!
//! A `LedgerSnapshot` is the ordered list of blocks plus the pending pool in
//! arrival order.  Claims are not persisted: a reloaded ledger starts with
//! every pending transaction unclaimed.  Loading re-runs `verify_chain`, so
//! a tampered file is refused rather than silently adopted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use chainsec_contracts::{
    error::{ChainSecError, ChainSecResult},
    transaction::Transaction,
};

use crate::{block::Block, ledger::Ledger};

/// Serializable form of a whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub blocks: Vec<Block>,
    pub pending: Vec<Transaction>,
}

impl Ledger {
    /// Capture blocks and pending pool.
    pub fn snapshot(&self) -> ChainSecResult<LedgerSnapshot> {
        let (blocks, pending) = self.snapshot_parts()?;
        Ok(LedgerSnapshot { blocks, pending })
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// Fails with `BrokenChain` when the chain does not verify or a nonce
    /// repeats inside it, and with `DuplicateNonce` when a pending
    /// transaction replays a nonce already in the chain or pool.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> ChainSecResult<Self> {
        Ledger::from_parts(snapshot.blocks, snapshot.pending)
    }

    /// Write the ledger to `path` as JSON.
    pub fn save_to_file(&self, path: &Path) -> ChainSecResult<()> {
        let snapshot = self.snapshot()?;
        let json = serde_json::to_vec_pretty(&snapshot).map_err(|e| ChainSecError::Persistence {
            reason: format!("failed to encode ledger snapshot: {e}"),
        })?;
        std::fs::write(path, json).map_err(|e| ChainSecError::Persistence {
            reason: format!("failed to write ledger file '{}': {e}", path.display()),
        })?;

        info!(
            path = %path.display(),
            block_count = snapshot.blocks.len(),
            pending_count = snapshot.pending.len(),
            "ledger saved"
        );
        Ok(())
    }

    /// Read a ledger previously written by `save_to_file`.
    pub fn load_from_file(path: &Path) -> ChainSecResult<Self> {
        let contents = std::fs::read(path).map_err(|e| ChainSecError::Persistence {
            reason: format!("failed to read ledger file '{}': {e}", path.display()),
        })?;
        let snapshot: LedgerSnapshot =
            serde_json::from_slice(&contents).map_err(|e| ChainSecError::Persistence {
                reason: format!("ledger file '{}' is not a valid snapshot: {e}", path.display()),
            })?;
        Ledger::from_snapshot(snapshot)
    }
}
