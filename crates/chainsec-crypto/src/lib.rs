//! # chainsec-crypto
//!
//! Canonical hashing and Ed25519 signatures for the ChainSec agent ledger.
//!
//! A transaction's signature covers `hash(data)`: the hex SHA-256 of the
//! canonical JSON encoding of its payload.  The same `hash` function
//! identifies transactions and feeds block hashing, so everything that must
//! be reproducible across processes goes through `canonical_bytes`.
//!
//! ```rust,ignore
//! use chainsec_crypto::{derive_public_key, hash, sign, verify};
//!
//! let digest = hash(&data)?;
//! let signature = sign(&private_key, digest.as_bytes())?;
//! assert!(verify(&derive_public_key(&private_key)?, digest.as_bytes(), &signature));
//! ```

pub mod canonical;
pub mod keys;

pub use canonical::{canonical_bytes, hash, hash_bytes, hash_parts};
pub use keys::{derive_public_key, generate_private_key, sign, verify};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// The signature scheme the ledger relies on: sign the hash of the data,
    /// verify against a freshly recomputed hash.
    #[test]
    fn signature_over_data_hash_round_trips_and_detects_mutation() {
        let private_key = generate_private_key();
        let public_key = derive_public_key(&private_key).unwrap();

        let data = json!({ "task": "Simple data processing", "result": { "items": 3 } });
        let digest = hash(&data).unwrap();
        let signature = sign(&private_key, digest.as_bytes()).unwrap();

        assert!(verify(&public_key, hash(&data).unwrap().as_bytes(), &signature));

        let mutated = json!({ "task": "Simple data processing", "result": { "items": 4 } });
        assert!(!verify(&public_key, hash(&mutated).unwrap().as_bytes(), &signature));
    }
}
