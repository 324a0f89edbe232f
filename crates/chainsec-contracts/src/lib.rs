//! # chainsec-contracts
//!
//! Shared types, reports, and errors for the ChainSec agent ledger.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions and error types.

pub mod agent;
pub mod error;
pub mod report;
pub mod transaction;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use agent::{AgentId, ValidatorId};
    use error::ChainSecError;
    use report::{StageOutcome, ValidationReport};
    use transaction::Transaction;

    // ── Transaction wire form ────────────────────────────────────────────────

    #[test]
    fn transaction_missing_fields_still_parses() {
        // A request that omits receiver, timestamp and the signature must
        // still be representable so the pipeline can reject it with a reason.
        let tx: Transaction = serde_json::from_value(json!({
            "sender": "agent-a",
            "data": { "task": "noop" },
            "nonce": 7
        }))
        .unwrap();

        assert_eq!(tx.sender, AgentId::new("agent-a"));
        assert!(tx.receiver.is_empty());
        assert_eq!(tx.timestamp, 0);
        assert!(tx.is_unsigned());
        assert_eq!(tx.replay_key(), (AgentId::new("agent-a"), 7));
    }

    #[test]
    fn transaction_signature_is_hex_on_the_wire() {
        let tx = Transaction {
            sender: AgentId::new("a"),
            receiver: AgentId::new("b"),
            data: json!({}),
            public_key: "ab".to_string(),
            signature: vec![0xde, 0xad],
            timestamp: 1,
            nonce: 1,
            previous_hash: String::new(),
            block_hash: None,
        };

        let wire = serde_json::to_value(&tx).unwrap();
        assert_eq!(wire["signature"], json!("dead"));
        assert!(wire.get("block_hash").is_none(), "absent claim is not serialized");
    }

    // ── ValidationReport ─────────────────────────────────────────────────────

    #[test]
    fn report_starts_valid_and_empty() {
        let report = ValidationReport::new();
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.stages_passed, 0);
        assert_eq!(report.validation_score(), 0);
    }

    #[test]
    fn validation_score_scales_counted_stages() {
        let mut report = ValidationReport::new();
        report.stages_passed = 3;
        assert_eq!(report.validation_score(), 100);
        report.stages_passed = 2;
        assert_eq!(report.validation_score(), 66);
        report.stages_passed = 1;
        assert_eq!(report.validation_score(), 33);
    }

    #[test]
    fn has_warning_matches_substring() {
        let mut report = ValidationReport::new();
        report
            .warnings
            .push("Low reputation agent - additional verification required".to_string());
        assert!(report.has_warning("Low reputation"));
        assert!(!report.has_warning("Medium reputation"));
    }

    #[test]
    fn stage_outcome_helpers() {
        assert_eq!(
            StageOutcome::clear(),
            StageOutcome::Advisory { warning: None, invalidate: false }
        );
        assert_eq!(
            StageOutcome::rejected("boom"),
            StageOutcome::Rejected { error: "boom".to_string() }
        );
    }

    // ── ValidatorId ──────────────────────────────────────────────────────────

    #[test]
    fn validator_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| ValidatorId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── ChainSecError display messages ───────────────────────────────────────

    #[test]
    fn error_duplicate_nonce_display() {
        let err = ChainSecError::DuplicateNonce {
            sender: "agent-a".to_string(),
            nonce: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("duplicate nonce 42"));
        assert!(msg.contains("agent-a"));
    }

    #[test]
    fn error_unknown_tx_display() {
        let err = ChainSecError::UnknownTx { tx_id: "abc123".to_string() };
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn error_contract_timeout_display() {
        let err = ChainSecError::ContractTimeout { timeout_ms: 250 };
        assert!(err.to_string().contains("250 ms"));
    }

    #[test]
    fn error_no_private_key_display() {
        let err = ChainSecError::NoPrivateKey { agent_id: "TaskAgent-v1".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("TaskAgent-v1"));
        assert!(msg.contains("no private key"));
    }
}
