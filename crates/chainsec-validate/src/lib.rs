//! # chainsec-validate
//!
//! The concrete validation stages of the ChainSec pipeline and the function
//! that wires them into the standard order.
//!
//! Each stage implements `ValidationStage` from `chainsec-core`.  Stages that
//! need outside state receive it through the core trait seams
//! (`ChainView`, `ReputationView`, `ContractRuleChecker`), so the ledger,
//! reputation store and rule checker can all be swapped for fakes.
//!
//! ```rust,ignore
//! use chainsec_validate::{standard_pipeline, PipelineConfig};
//!
//! let pipeline = standard_pipeline(ledger, reputation, rules, &PipelineConfig::default())?;
//! let report = pipeline.validate(&tx);
//! ```

pub mod config;
pub mod stages;
pub mod standard;

pub use config::PipelineConfig;
pub use standard::standard_pipeline;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use chainsec_contracts::{
        agent::AgentId,
        error::ChainSecResult,
        transaction::{Hash, Transaction},
    };
    use chainsec_core::{
        traits::{ChainView, ContractRuleChecker, ReputationView},
        ValidationPipeline,
    };
    use chainsec_crypto::{derive_public_key, generate_private_key, hash, sign};

    use crate::{stages, standard_pipeline, PipelineConfig};

    const TIP: &str = "1111111111111111111111111111111111111111111111111111111111111111";

    // ── Fakes ─────────────────────────────────────────────────────────────────

    struct FixedTip;

    impl ChainView for FixedTip {
        fn tip_hash(&self) -> ChainSecResult<Hash> {
            Ok(TIP.to_string())
        }
    }

    struct FixedScore(u8);

    impl ReputationView for FixedScore {
        fn score(&self, _agent_id: &AgentId) -> ChainSecResult<u8> {
            Ok(self.0)
        }
    }

    struct CountingChecker {
        allow: bool,
        calls: Arc<Mutex<u32>>,
    }

    impl ContractRuleChecker for CountingChecker {
        fn check(&self, _tx: &Transaction) -> ChainSecResult<bool> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.allow)
        }
    }

    fn pipeline(score: u8, allow: bool) -> (ValidationPipeline, Arc<Mutex<u32>>) {
        let calls = Arc::new(Mutex::new(0));
        let checker = CountingChecker { allow, calls: calls.clone() };
        let pipeline = standard_pipeline(
            Arc::new(FixedTip),
            Arc::new(FixedScore(score)),
            Arc::new(checker),
            &PipelineConfig::default(),
        )
        .unwrap();
        (pipeline, calls)
    }

    fn signed_tx() -> Transaction {
        let private_key = generate_private_key();
        let data = json!({ "task": "Simple data processing", "result": "ok" });
        let digest = hash(&data).unwrap();
        Transaction {
            sender: AgentId::new("agent-a"),
            receiver: AgentId::new("Network"),
            public_key: derive_public_key(&private_key).unwrap(),
            signature: sign(&private_key, digest.as_bytes()).unwrap(),
            data,
            timestamp: 1_700_000_000_000,
            nonce: 1_700_000_000_000,
            previous_hash: TIP.to_string(),
            block_hash: Some(TIP.to_string()),
        }
    }

    // ── Standard order ────────────────────────────────────────────────────────

    #[test]
    fn test_stage_order() {
        let (pipeline, _) = pipeline(80, true);
        assert_eq!(
            pipeline.stage_names(),
            vec!["structural", "cryptographic", "contract", "consensus", "reputation"]
        );
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let config = PipelineConfig {
            low_reputation_threshold: 90,
            ..PipelineConfig::default()
        };
        let result = standard_pipeline(
            Arc::new(FixedTip),
            Arc::new(FixedScore(80)),
            Arc::new(CountingChecker { allow: true, calls: Arc::new(Mutex::new(0)) }),
            &config,
        );
        assert!(result.is_err());
    }

    // ── Reputation gate ───────────────────────────────────────────────────────

    #[test]
    fn test_high_reputation_is_accepted_cleanly() {
        let (pipeline, _) = pipeline(80, true);
        let report = pipeline.validate(&signed_tx());

        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.stages_passed, 3);
        assert_eq!(report.validation_score(), 100);
    }

    #[test]
    fn test_low_reputation_is_gated() {
        let (pipeline, _) = pipeline(45, true);
        let report = pipeline.validate(&signed_tx());

        assert!(!report.valid);
        assert!(report.errors.is_empty());
        assert!(report.has_warning("Low reputation"));
        assert_eq!(report.stages_passed, 3);
    }

    #[test]
    fn test_medium_reputation_only_warns() {
        let (pipeline, _) = pipeline(60, true);
        let report = pipeline.validate(&signed_tx());

        assert!(report.valid);
        assert_eq!(report.warnings, vec![stages::MEDIUM_REPUTATION.to_string()]);
    }

    // ── Hard failures ─────────────────────────────────────────────────────────

    #[test]
    fn test_missing_fields_stop_at_structural() {
        let (pipeline, calls) = pipeline(80, true);
        let mut tx = signed_tx();
        tx.receiver = AgentId::default();

        let report = pipeline.validate(&tx);

        assert!(!report.valid);
        assert_eq!(report.errors, vec![stages::MISSING_FIELDS.to_string()]);
        assert_eq!(report.stages_passed, 0);
        assert!(report.warnings.is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_tampered_data_stops_at_cryptographic() {
        let (pipeline, calls) = pipeline(80, true);
        let mut tx = signed_tx();
        tx.data = json!({ "task": "Simple data processing", "result": "forged" });

        let report = pipeline.validate(&tx);

        assert_eq!(report.errors, vec![stages::INVALID_SIGNATURE.to_string()]);
        assert_eq!(report.stages_passed, 1);
        assert_eq!(*calls.lock().unwrap(), 0, "contract checker must not run");
    }

    #[test]
    fn test_contract_refusal_stops_before_soft_stages() {
        let (pipeline, calls) = pipeline(10, false);
        let mut tx = signed_tx();
        tx.block_hash = None;

        let report = pipeline.validate(&tx);

        assert_eq!(report.errors, vec![stages::CONTRACT_FAILED.to_string()]);
        assert_eq!(report.stages_passed, 2);
        assert!(report.warnings.is_empty(), "soft stages must not run after a hard failure");
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    // ── Soft stages ───────────────────────────────────────────────────────────

    #[test]
    fn test_stale_tip_warns_but_accepts() {
        let (pipeline, _) = pipeline(80, true);
        let mut tx = signed_tx();
        tx.block_hash = Some("f".repeat(64));

        let report = pipeline.validate(&tx);

        assert!(report.valid);
        assert_eq!(report.warnings, vec![stages::CONSENSUS_PENDING.to_string()]);
        assert_eq!(report.stages_passed, 3);
    }
}
