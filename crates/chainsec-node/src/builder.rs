//! Transaction assembly: nonce, chain position, signature.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use chainsec_contracts::{
    agent::AgentId,
    error::{ChainSecError, ChainSecResult},
    transaction::{Transaction, TxId},
};
use chainsec_crypto::hash;
use chainsec_ledger::Ledger;

use crate::identity::AgentIdentity;

/// Receiver of task-result transactions.
pub const NETWORK_RECEIVER: &str = "Network";

// ── Nonces ────────────────────────────────────────────────────────────────────

/// Per-sender monotonic nonce source.
///
/// Each nonce is `max(last + 1, now_ms)`: close to wall-clock time so that
/// nonces stay unique across restarts, but strictly increasing per sender
/// even when two builds land in the same millisecond or the clock steps back.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: Mutex<HashMap<AgentId, u64>>,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, sender: &AgentId) -> ChainSecResult<u64> {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(sender, now_ms)
    }

    fn next_at(&self, sender: &AgentId, now_ms: u64) -> ChainSecResult<u64> {
        let mut last = self.last.lock().map_err(|e| ChainSecError::LockPoisoned {
            resource: format!("nonce generator: {e}"),
        })?;
        let nonce = match last.get(sender) {
            Some(prev) => now_ms.max(prev.saturating_add(1)),
            None => now_ms,
        };
        last.insert(sender.clone(), nonce);
        Ok(nonce)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builds, signs, and submits transactions against one ledger.
pub struct TransactionBuilder {
    ledger: Arc<Ledger>,
    nonces: NonceGenerator,
}

impl TransactionBuilder {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            nonces: NonceGenerator::new(),
        }
    }

    /// Assemble and sign a transaction from `sender` to `receiver`.
    ///
    /// `previous_hash` and `block_hash` both record the current tip.  The
    /// signature covers `hash(data)`.  Fails with `NoPrivateKey` if `sender`
    /// cannot sign.
    pub fn build_and_sign(
        &self,
        sender: &AgentIdentity,
        receiver: impl Into<AgentId>,
        data: Value,
    ) -> ChainSecResult<Transaction> {
        let public_key = sender.public_key()?;
        let digest = hash(&data)?;
        let signature = sender.sign(digest.as_bytes())?;

        let tip = self.ledger.tip()?;
        let nonce = self.nonces.next(sender.agent_id())?;

        let tx = Transaction {
            sender: sender.agent_id().clone(),
            receiver: receiver.into(),
            data,
            public_key,
            signature,
            timestamp: Utc::now().timestamp_millis(),
            nonce,
            previous_hash: tip.hash.clone(),
            block_hash: Some(tip.hash),
        };

        debug!(sender = %tx.sender, receiver = %tx.receiver, nonce, "transaction signed");
        Ok(tx)
    }

    /// Build, sign, and submit to the ledger's pending pool.
    pub fn submit(
        &self,
        sender: &AgentIdentity,
        receiver: impl Into<AgentId>,
        data: Value,
    ) -> ChainSecResult<TxId> {
        let tx = self.build_and_sign(sender, receiver, data)?;
        let tx_id = self.ledger.submit(tx)?;
        info!(tx_id = %tx_id, sender = %sender.agent_id(), "transaction submitted");
        Ok(tx_id)
    }

    /// Log the result of an externally executed task to the network.
    pub fn record_task(&self, sender: &AgentIdentity, task: &str, result: Value) -> ChainSecResult<TxId> {
        self.submit(sender, NETWORK_RECEIVER, json!({ "task": task, "result": result }))
    }
}
