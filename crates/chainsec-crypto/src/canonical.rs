//! Canonical serialization and SHA-256 hashing.
//!
//! Every hash in ChainSec is computed over the RFC 8785 (JCS) form of the
//! value: object keys sorted, no whitespace, numbers written the way
//! ECMAScript prints them.  `1` and `1.0` therefore hash identically, and a
//! ledger reloaded from disk re-hashes to the same bytes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use chainsec_contracts::{
    error::{ChainSecError, ChainSecResult},
    transaction::Hash,
};

/// Produce the canonical byte encoding of `payload`.
pub fn canonical_bytes<T: Serialize + ?Sized>(payload: &T) -> ChainSecResult<Vec<u8>> {
    serde_jcs::to_vec(payload).map_err(|e| ChainSecError::Serialization {
        reason: format!("JCS canonicalization failed: {e}"),
    })
}

/// SHA-256 of the canonical encoding of `payload`, as lowercase hex.
pub fn hash<T: Serialize + ?Sized>(payload: &T) -> ChainSecResult<Hash> {
    Ok(hash_bytes(&canonical_bytes(payload)?))
}

/// SHA-256 of raw bytes, as lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> Hash {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over several byte sequences fed in order, as lowercase hex.
///
/// Callers are responsible for making the layout unambiguous (fixed-width
/// integers, fixed-length hashes).
pub fn hash_parts(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
