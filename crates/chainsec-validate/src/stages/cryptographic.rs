//! Cryptographic stage: the signature must cover `hash(data)` under the
//! transaction's own public key.

use tracing::warn;

use chainsec_contracts::{report::StageOutcome, transaction::Transaction};
use chainsec_core::traits::ValidationStage;
use chainsec_crypto::{hash, verify};

use super::{INVALID_SIGNATURE, MISSING_CRYPTO};

#[derive(Debug, Default)]
pub struct CryptographicStage;

impl CryptographicStage {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationStage for CryptographicStage {
    fn evaluate(&self, tx: &Transaction) -> StageOutcome {
        if tx.is_unsigned() {
            return StageOutcome::rejected(MISSING_CRYPTO);
        }

        let verified = match hash(&tx.data) {
            Ok(digest) => verify(&tx.public_key, digest.as_bytes(), &tx.signature),
            Err(_) => false,
        };

        if verified {
            StageOutcome::Passed
        } else {
            warn!(
                security_event = true,
                sender = %tx.sender,
                nonce = tx.nonce,
                public_key = %tx.public_key,
                "invalid transaction signature"
            );
            StageOutcome::rejected(INVALID_SIGNATURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use chainsec_contracts::agent::AgentId;
    use chainsec_crypto::{derive_public_key, generate_private_key, sign};

    use super::*;

    fn signed(data: serde_json::Value) -> Transaction {
        let private_key = generate_private_key();
        let digest = hash(&data).unwrap();
        Transaction {
            sender: AgentId::new("agent-a"),
            receiver: AgentId::new("Network"),
            public_key: derive_public_key(&private_key).unwrap(),
            signature: sign(&private_key, digest.as_bytes()).unwrap(),
            data,
            timestamp: 1,
            nonce: 1,
            previous_hash: String::new(),
            block_hash: None,
        }
    }

    #[test]
    fn valid_signature_passes() {
        let tx = signed(json!({ "task": "t" }));
        assert_eq!(CryptographicStage::new().evaluate(&tx), StageOutcome::Passed);
    }

    #[test]
    fn missing_elements_are_reported_before_verification() {
        let mut tx = signed(json!({ "task": "t" }));
        tx.signature.clear();
        assert_eq!(CryptographicStage::new().evaluate(&tx), StageOutcome::rejected(MISSING_CRYPTO));

        let mut tx = signed(json!({ "task": "t" }));
        tx.public_key.clear();
        assert_eq!(CryptographicStage::new().evaluate(&tx), StageOutcome::rejected(MISSING_CRYPTO));
    }

    #[test]
    fn mutated_data_fails_verification() {
        let mut tx = signed(json!({ "task": "t", "amount": 1 }));
        tx.data = json!({ "task": "t", "amount": 1000 });
        assert_eq!(
            CryptographicStage::new().evaluate(&tx),
            StageOutcome::rejected(INVALID_SIGNATURE)
        );
    }

    /// Re-signing with another key but keeping the old public key fails.
    #[test]
    fn foreign_key_fails_verification() {
        let mut tx = signed(json!({ "task": "t" }));
        let other = signed(json!({ "task": "t" }));
        tx.signature = other.signature;
        assert_eq!(
            CryptographicStage::new().evaluate(&tx),
            StageOutcome::rejected(INVALID_SIGNATURE)
        );
    }

    #[test]
    fn garbage_public_key_is_a_failed_verification() {
        let mut tx = signed(json!({ "task": "t" }));
        tx.public_key = "not hex at all".to_string();
        assert_eq!(
            CryptographicStage::new().evaluate(&tx),
            StageOutcome::rejected(INVALID_SIGNATURE)
        );
    }
}
