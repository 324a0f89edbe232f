//! The in-memory ledger: block chain plus pending-transaction pool.
//!
//! `Ledger` keeps all mutable state in one `LedgerState` behind a `Mutex`.
//! Every mutator (`submit`, `claim_next`, `release`, `discard`,
//! `finalize_block`) takes that lock, so appends are totally ordered and a
//! claimed transaction is never handed to a second validator.  Validation
//! itself happens outside the lock: callers claim, release the guard, run
//! the pipeline, then come back to finalize or discard.
//!
//! Share a ledger by wrapping it in an `Arc`; there is no global instance.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use chainsec_contracts::{
    agent::{AgentId, ValidatorId},
    error::{ChainSecError, ChainSecResult},
    transaction::{Hash, Transaction, TxId},
};
use chainsec_core::traits::ChainView;

use crate::{
    block::Block,
    chain::{hash_block, transaction_id, verify_chain},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    /// Finalized blocks, genesis first.  Append-only.
    pub(crate) blocks: Vec<Block>,

    /// Pending transaction ids in arrival order.
    pub(crate) pending_order: Vec<TxId>,

    pub(crate) pending: HashMap<TxId, Transaction>,

    /// Pending transactions currently leased by a validator.
    pub(crate) claims: HashMap<TxId, ValidatorId>,

    /// Every `(sender, nonce)` present in the pool or any block.
    pub(crate) nonces: HashSet<(AgentId, u64)>,
}

impl LedgerState {
    fn genesis() -> Self {
        Self {
            blocks: vec![Block::genesis()],
            pending_order: Vec::new(),
            pending: HashMap::new(),
            claims: HashMap::new(),
            nonces: HashSet::new(),
        }
    }

    fn tip(&self) -> &Block {
        // `blocks` always holds at least the genesis block.
        &self.blocks[self.blocks.len() - 1]
    }

    fn insert_pending(&mut self, tx_id: TxId, tx: Transaction) {
        self.nonces.insert(tx.replay_key());
        self.pending_order.push(tx_id.clone());
        self.pending.insert(tx_id, tx);
    }

    /// `ClaimConflict` if `tx_id` is leased to anyone but `validator`.
    fn check_claim(&self, tx_id: &TxId, validator: ValidatorId) -> ChainSecResult<()> {
        match self.claims.get(tx_id) {
            Some(holder) if *holder != validator => Err(ChainSecError::ClaimConflict {
                tx_id: tx_id.clone(),
                holder: holder.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn remove_pending(&mut self, tx_id: &TxId) -> Option<Transaction> {
        let tx = self.pending.remove(tx_id)?;
        self.pending_order.retain(|id| id != tx_id);
        self.claims.remove(tx_id);
        Some(tx)
    }
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An append-only, hash-chained ledger with a FIFO pending pool.
///
/// # Thread safety
///
/// All methods take `&self` and synchronize on one internal `Mutex`.  Wrap
/// the ledger in an `Arc` to share it between builders and validators.
pub struct Ledger {
    pub(crate) state: Mutex<LedgerState>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::genesis()),
        }
    }

    pub(crate) fn from_parts(blocks: Vec<Block>, pending: Vec<Transaction>) -> ChainSecResult<Self> {
        if blocks.is_empty() {
            return Err(ChainSecError::BrokenChain {
                reason: "chain has no genesis block".to_string(),
            });
        }
        if !verify_chain(&blocks) {
            return Err(ChainSecError::BrokenChain {
                reason: "stored block hashes or linkage do not verify".to_string(),
            });
        }

        let mut state = LedgerState {
            blocks,
            pending_order: Vec::new(),
            pending: HashMap::new(),
            claims: HashMap::new(),
            nonces: HashSet::new(),
        };

        for tx in state.blocks.iter().flat_map(|b| b.transactions.iter()) {
            if !state.nonces.insert(tx.replay_key()) {
                return Err(ChainSecError::BrokenChain {
                    reason: format!(
                        "nonce {} for sender '{}' appears twice in the chain",
                        tx.nonce, tx.sender
                    ),
                });
            }
        }

        for tx in pending {
            if state.nonces.contains(&tx.replay_key()) {
                return Err(ChainSecError::DuplicateNonce {
                    sender: tx.sender.0.clone(),
                    nonce: tx.nonce,
                });
            }
            let tx_id = transaction_id(&tx)?;
            state.insert_pending(tx_id, tx);
        }

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> ChainSecResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| ChainSecError::LockPoisoned {
            resource: format!("ledger state: {e}"),
        })
    }

    /// Add a transaction to the pending pool.
    ///
    /// Only checks what is needed to store the transaction safely: that it
    /// hashes, and that `(sender, nonce)` has not been seen in the pool or
    /// any block.  Full validation is the pipeline's job.
    ///
    /// Returns the transaction's id, or `DuplicateNonce`.
    pub fn submit(&self, tx: Transaction) -> ChainSecResult<TxId> {
        let tx_id = transaction_id(&tx)?;
        let mut state = self.state()?;

        if state.nonces.contains(&tx.replay_key()) {
            warn!(
                sender = %tx.sender,
                nonce = tx.nonce,
                "rejected submission with replayed nonce"
            );
            return Err(ChainSecError::DuplicateNonce {
                sender: tx.sender.0.clone(),
                nonce: tx.nonce,
            });
        }

        debug!(tx_id = %tx_id, sender = %tx.sender, nonce = tx.nonce, "transaction pooled");
        state.insert_pending(tx_id.clone(), tx);
        Ok(tx_id)
    }

    /// Lease the oldest unclaimed pending transaction to `validator`.
    ///
    /// Returns `None` when every pending transaction is already claimed or
    /// the pool is empty.  The lease lasts until `release`, `discard`, or
    /// `finalize_block` touches the transaction.
    pub fn claim_next(&self, validator: ValidatorId) -> ChainSecResult<Option<(TxId, Transaction)>> {
        let mut state = self.state()?;

        let next = state
            .pending_order
            .iter()
            .find(|id| !state.claims.contains_key(*id))
            .cloned();

        let Some(tx_id) = next else {
            return Ok(None);
        };

        state.claims.insert(tx_id.clone(), validator);
        let tx = state.pending.get(&tx_id).cloned().ok_or_else(|| ChainSecError::UnknownTx {
            tx_id: tx_id.clone(),
        })?;

        debug!(tx_id = %tx_id, validator = %validator, "transaction claimed");
        Ok(Some((tx_id, tx)))
    }

    /// Return `validator`'s claim so another validator can retry the
    /// transaction.  Releasing an unclaimed transaction is a no-op; a claim
    /// held by someone else is refused with `ClaimConflict`.
    pub fn release(&self, tx_id: &TxId, validator: ValidatorId) -> ChainSecResult<()> {
        let mut state = self.state()?;
        if !state.pending.contains_key(tx_id) {
            return Err(ChainSecError::UnknownTx { tx_id: tx_id.clone() });
        }
        state.check_claim(tx_id, validator)?;
        state.claims.remove(tx_id);
        Ok(())
    }

    /// The validator currently holding a claim on `tx_id`, if any.
    pub fn claimed_by(&self, tx_id: &TxId) -> ChainSecResult<Option<ValidatorId>> {
        Ok(self.state()?.claims.get(tx_id).copied())
    }

    /// Drop a rejected transaction from the pool.
    ///
    /// Its nonce is freed: rejected transactions are never stored, so the
    /// sender may resubmit.  Refused with `ClaimConflict` if another
    /// validator holds the claim.
    pub fn discard(&self, tx_id: &TxId, validator: ValidatorId) -> ChainSecResult<Transaction> {
        let mut state = self.state()?;
        if state.pending.contains_key(tx_id) {
            state.check_claim(tx_id, validator)?;
        }
        let tx = state
            .remove_pending(tx_id)
            .ok_or_else(|| ChainSecError::UnknownTx { tx_id: tx_id.clone() })?;
        state.nonces.remove(&tx.replay_key());

        debug!(tx_id = %tx_id, sender = %tx.sender, "transaction discarded");
        Ok(tx)
    }

    /// Move `accepted` from the pool into a new block and append it.
    ///
    /// Atomic: if any id is not pending (or is listed twice), returns
    /// `UnknownTx`; if any is claimed by a validator other than `validator`,
    /// returns `ClaimConflict`.  Either way the ledger is untouched.
    /// Transaction order in the block follows `accepted`.
    pub fn finalize_block(&self, accepted: &[TxId], validator: ValidatorId) -> ChainSecResult<Block> {
        let mut state = self.state()?;

        let mut seen: HashSet<&TxId> = HashSet::new();
        let mut transactions = Vec::with_capacity(accepted.len());
        for tx_id in accepted {
            let tx = state.pending.get(tx_id).filter(|_| seen.insert(tx_id)).ok_or_else(|| {
                ChainSecError::UnknownTx { tx_id: tx_id.clone() }
            })?;
            transactions.push(tx.clone());
            state.check_claim(tx_id, validator)?;
        }

        let tip = state.tip();
        let index = tip.index + 1;
        let previous_hash = tip.hash.clone();
        let timestamp = Utc::now().timestamp_millis();
        let hash = hash_block(index, timestamp, &previous_hash, &transactions)?;

        // Nothing below can fail: commit.
        for tx_id in accepted {
            state.remove_pending(tx_id);
        }

        let block = Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            hash,
        };
        state.blocks.push(block.clone());

        info!(
            index = block.index,
            hash = %block.hash,
            tx_count = block.transactions.len(),
            "block finalized"
        );

        Ok(block)
    }

    /// The last block in the chain (genesis on a fresh ledger).
    pub fn tip(&self) -> ChainSecResult<Block> {
        Ok(self.state()?.tip().clone())
    }

    /// Check stored hashes and linkage of the whole chain.
    ///
    /// A poisoned lock counts as a failed check.
    pub fn verify_chain(&self) -> bool {
        match self.state() {
            Ok(state) => verify_chain(&state.blocks),
            Err(_) => false,
        }
    }

    /// Number of finalized blocks after genesis.
    pub fn height(&self) -> ChainSecResult<u64> {
        Ok(self.state()?.tip().index)
    }

    /// A copy of every block, genesis first.
    pub fn blocks(&self) -> ChainSecResult<Vec<Block>> {
        Ok(self.state()?.blocks.clone())
    }

    pub fn pending_len(&self) -> ChainSecResult<usize> {
        Ok(self.state()?.pending_order.len())
    }

    /// Pending transaction ids in arrival order.
    pub fn pending_ids(&self) -> ChainSecResult<Vec<TxId>> {
        Ok(self.state()?.pending_order.clone())
    }

    pub fn get_pending(&self, tx_id: &TxId) -> ChainSecResult<Option<Transaction>> {
        Ok(self.state()?.pending.get(tx_id).cloned())
    }

    /// True if `(sender, nonce)` is in the pool or any block.
    pub fn contains_nonce(&self, sender: &AgentId, nonce: u64) -> ChainSecResult<bool> {
        Ok(self.state()?.nonces.contains(&(sender.clone(), nonce)))
    }

    /// Blocks plus pending transactions in arrival order, read under one
    /// lock so the two halves are consistent.
    pub(crate) fn snapshot_parts(&self) -> ChainSecResult<(Vec<Block>, Vec<Transaction>)> {
        let state = self.state()?;
        let pending = state
            .pending_order
            .iter()
            .filter_map(|id| state.pending.get(id).cloned())
            .collect();
        Ok((state.blocks.clone(), pending))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// ── ChainView impl ────────────────────────────────────────────────────────────

impl ChainView for Ledger {
    fn tip_hash(&self) -> ChainSecResult<Hash> {
        Ok(self.state()?.tip().hash.clone())
    }
}
