//! The signed transaction an agent submits to the ledger.
//!
//! Fields that the structural stage checks (`sender`, `receiver`, `data`,
//! `timestamp`) and the cryptographic elements (`public_key`, `signature`)
//! all default when absent from the wire form.  A transaction missing them
//! can therefore still be parsed and pooled; it is the validation pipeline,
//! not the deserializer, that rejects it with a concrete reason.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// Lowercase, 64-character hex SHA-256 digest.
pub type Hash = String;

/// Identity of a transaction: the hash of its canonical serialization.
pub type TxId = Hash;

/// A signed record of one agent action.
///
/// Immutable once signed.  `signature` covers `hash(data)` under
/// `public_key`; `(sender, nonce)` is unique across the pending pool and
/// every finalized block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub sender: AgentId,

    #[serde(default)]
    pub receiver: AgentId,

    /// Opaque action payload produced by the task-execution collaborator.
    #[serde(default)]
    pub data: serde_json::Value,

    /// Hex-encoded Ed25519 verifying key of the sender.
    #[serde(default)]
    pub public_key: String,

    /// Ed25519 signature over `hash(data)`, hex-encoded on the wire.
    #[serde(default, with = "hex::serde")]
    pub signature: Vec<u8>,

    /// Wall-clock creation time, UTC milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub nonce: u64,

    /// Hash of the ledger tip when the transaction was built.
    #[serde(default)]
    pub previous_hash: Hash,

    /// The tip hash the sender claims to be building on.  Read by the
    /// consensus stage; absent means "no claim".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<Hash>,
}

impl Transaction {
    /// The replay-protection key for this transaction.
    pub fn replay_key(&self) -> (AgentId, u64) {
        (self.sender.clone(), self.nonce)
    }

    /// True when either cryptographic element is absent.
    pub fn is_unsigned(&self) -> bool {
        self.public_key.is_empty() || self.signature.is_empty()
    }
}
