//! Hash-chain primitives: block hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp as 8-byte little-endian
//!   3. previous_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the transaction list

use chainsec_contracts::{
    error::ChainSecResult,
    transaction::{Hash, Transaction, TxId},
};
use chainsec_crypto::{canonical_bytes, hash, hash_parts};

use crate::block::Block;

/// Compute the SHA-256 hash of a block from its fields.
pub fn hash_block(
    index: u64,
    timestamp: i64,
    previous_hash: &str,
    transactions: &[Transaction],
) -> ChainSecResult<Hash> {
    let transactions_json = canonical_bytes(transactions)?;
    Ok(hash_block_parts(index, timestamp, previous_hash, &transactions_json))
}

pub(crate) fn hash_block_parts(
    index: u64,
    timestamp: i64,
    previous_hash: &str,
    transactions_json: &[u8],
) -> Hash {
    let index_bytes = index.to_le_bytes();
    let timestamp_bytes = timestamp.to_le_bytes();
    hash_parts(&[
        index_bytes.as_slice(),
        timestamp_bytes.as_slice(),
        previous_hash.as_bytes(),
        transactions_json,
    ])
}

/// The identity of a transaction: the hash of its canonical form.
pub fn transaction_id(tx: &Transaction) -> ChainSecResult<TxId> {
    hash(tx)
}

/// Verify the integrity of a chain of blocks.
///
/// Returns `true` when every block satisfies all three rules:
///
/// 1. **Position**: `index` equals the block's position in the slice.
/// 2. **Linkage**: `previous_hash` equals the preceding block's `hash`
///    (or `Block::GENESIS_HASH` for block 0).
/// 3. **Hash correctness**: `hash` matches the value recomputed from the
///    block's own fields.
///
/// Returns `false` the moment any mismatch is detected.  An empty chain is
/// defined as valid.
pub fn verify_chain(blocks: &[Block]) -> bool {
    let mut expected_prev = Block::GENESIS_HASH.to_string();

    for (position, block) in blocks.iter().enumerate() {
        if block.index != position as u64 {
            return false;
        }

        if block.previous_hash != expected_prev {
            return false;
        }

        let recomputed = match hash_block(
            block.index,
            block.timestamp,
            &block.previous_hash,
            &block.transactions,
        ) {
            Ok(h) => h,
            Err(_) => return false,
        };
        if block.hash != recomputed {
            return false;
        }

        expected_prev = block.hash.clone();
    }

    true
}
