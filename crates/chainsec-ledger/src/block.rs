//! Block type.
//!
//! A `Block` is one link in the hash chain: an ordered batch of finalized
//! transactions that commits to its predecessor via `previous_hash`.
//! Modifying any field, including any transaction inside it, invalidates
//! `hash` and every later `previous_hash`, which `verify_chain` detects.

use serde::{Deserialize, Serialize};

use chainsec_contracts::transaction::{Hash, Transaction};

use crate::chain::hash_block_parts;

/// An immutable, hash-linked batch of finalized transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain; the genesis block is 0.
    pub index: u64,

    /// Finalization time, UTC milliseconds since the epoch.  Genesis uses 0.
    pub timestamp: i64,

    /// Finalized transactions in commit (= validation) order.
    pub transactions: Vec<Transaction>,

    /// `hash` of the previous block, or `GENESIS_HASH` for block 0.
    pub previous_hash: Hash,

    /// SHA-256 (hex) over (index, timestamp, previous_hash, transactions).
    pub hash: Hash,
}

impl Block {
    /// The sentinel `previous_hash` of the genesis block.
    ///
    /// 64 hex zeros: a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// The genesis block.
    ///
    /// Fixed timestamp and no transactions, so every ledger in every process
    /// starts from the same hash.
    pub fn genesis() -> Self {
        let previous_hash = Self::GENESIS_HASH.to_string();
        let hash = hash_block_parts(0, 0, &previous_hash, b"[]");
        Self {
            index: 0,
            timestamp: 0,
            transactions: Vec::new(),
            previous_hash,
            hash,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == Self::GENESIS_HASH
    }
}
