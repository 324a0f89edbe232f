//! Structural stage: required fields, checked with JSON Schema.
//!
//! The transaction is serialized to its wire JSON form and validated
//! against `TRANSACTION_SCHEMA`.  Because missing wire fields deserialize to
//! their defaults, "present" means non-empty `sender` / `receiver`, non-null
//! `data` and a non-zero `timestamp`.

use jsonschema::Validator;
use serde_json::json;
use tracing::debug;

use chainsec_contracts::{
    error::{ChainSecError, ChainSecResult},
    report::StageOutcome,
    transaction::Transaction,
};
use chainsec_core::traits::ValidationStage;

use super::MISSING_FIELDS;

fn transaction_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["sender", "receiver", "data", "timestamp"],
        "properties": {
            "sender": { "type": "string", "minLength": 1 },
            "receiver": { "type": "string", "minLength": 1 },
            "data": { "not": { "type": "null" } },
            "timestamp": { "type": "integer", "not": { "const": 0 } }
        }
    })
}

pub struct StructuralStage {
    validator: Validator,
}

impl StructuralStage {
    pub fn new() -> ChainSecResult<Self> {
        let validator =
            jsonschema::validator_for(&transaction_schema()).map_err(|e| ChainSecError::ConfigError {
                reason: format!("invalid transaction schema: {e}"),
            })?;
        Ok(Self { validator })
    }
}

impl ValidationStage for StructuralStage {
    fn evaluate(&self, tx: &Transaction) -> StageOutcome {
        let instance = match serde_json::to_value(tx) {
            Ok(v) => v,
            Err(e) => {
                debug!(sender = %tx.sender, error = %e, "transaction did not serialize");
                return StageOutcome::rejected(MISSING_FIELDS);
            }
        };

        let violations: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();

        if violations.is_empty() {
            StageOutcome::Passed
        } else {
            debug!(sender = %tx.sender, ?violations, "structural violations");
            StageOutcome::rejected(MISSING_FIELDS)
        }
    }
}

#[cfg(test)]
mod tests {
    use chainsec_contracts::{agent::AgentId, transaction::Transaction};
    use serde_json::json;

    use super::*;

    fn complete() -> Transaction {
        Transaction {
            sender: AgentId::new("agent-a"),
            receiver: AgentId::new("Network"),
            data: json!({ "task": "t" }),
            public_key: String::new(),
            signature: vec![],
            timestamp: 1_700_000_000_000,
            nonce: 1,
            previous_hash: String::new(),
            block_hash: None,
        }
    }

    #[test]
    fn complete_transaction_passes() {
        let stage = StructuralStage::new().unwrap();
        assert_eq!(stage.evaluate(&complete()), StageOutcome::Passed);
    }

    #[test]
    fn each_missing_field_is_rejected() {
        let stage = StructuralStage::new().unwrap();
        let rejected = StageOutcome::rejected(MISSING_FIELDS);

        let mut tx = complete();
        tx.sender = AgentId::default();
        assert_eq!(stage.evaluate(&tx), rejected);

        let mut tx = complete();
        tx.receiver = AgentId::default();
        assert_eq!(stage.evaluate(&tx), rejected);

        let mut tx = complete();
        tx.data = serde_json::Value::Null;
        assert_eq!(stage.evaluate(&tx), rejected);

        let mut tx = complete();
        tx.timestamp = 0;
        assert_eq!(stage.evaluate(&tx), rejected);
    }

    /// Fields absent from the wire form are caught here, not by serde.
    #[test]
    fn wire_form_without_data_is_rejected() {
        let stage = StructuralStage::new().unwrap();
        let tx: Transaction = serde_json::from_value(json!({
            "sender": "agent-a",
            "receiver": "Network",
            "timestamp": 5
        }))
        .unwrap();
        assert_eq!(stage.evaluate(&tx), StageOutcome::rejected(MISSING_FIELDS));
    }

    /// Falsy-but-present payloads are still payloads.
    #[test]
    fn empty_object_and_false_data_pass() {
        let stage = StructuralStage::new().unwrap();
        let mut tx = complete();
        tx.data = json!({});
        assert_eq!(stage.evaluate(&tx), StageOutcome::Passed);
        tx.data = json!(false);
        assert_eq!(stage.evaluate(&tx), StageOutcome::Passed);
    }
}
