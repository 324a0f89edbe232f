//! TOML-driven contract rule checker.
//!
//! Evaluation:
//!
//! 1. Iterate rules in declaration order.
//! 2. On the first rule whose `sender` and `receiver` patterns match:
//!    a. an `allow` rule denies anyway if a `required_data_fields` entry is
//!       missing from the transaction's `data`;
//!    b. otherwise the rule's verdict is returned.
//! 3. No rule matched → deny.

use std::path::Path;

use tracing::{debug, warn};

use chainsec_contracts::{
    error::{ChainSecError, ChainSecResult},
    transaction::Transaction,
};
use chainsec_core::traits::ContractRuleChecker;

use crate::rule::{RuleSetConfig, RuleVerdict};

/// Result of evaluating a transaction against the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractDecision {
    Allow { rule_id: String },
    Deny { reason: String },
}

impl ContractDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ContractDecision::Allow { .. })
    }
}

/// An in-process `ContractRuleChecker` backed by a TOML rule set.
///
/// ```rust,ignore
/// use chainsec_rules::TomlContractRules;
///
/// let rules = TomlContractRules::from_file(Path::new("rules/contract.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlContractRules {
    config: RuleSetConfig,
}

impl TomlContractRules {
    /// Returns `ChainSecError::ConfigError` if `s` is not a valid rule set.
    pub fn from_toml_str(s: &str) -> ChainSecResult<Self> {
        let config: RuleSetConfig = toml::from_str(s).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to parse contract rules TOML: {e}"),
        })?;
        Ok(Self { config })
    }

    pub fn from_file(path: &Path) -> ChainSecResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to read contract rules file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn rule_count(&self) -> usize {
        self.config.rules.len()
    }

    pub fn evaluate(&self, tx: &Transaction) -> ContractDecision {
        let sender = tx.sender.as_str();
        let receiver = tx.receiver.as_str();

        for rule in &self.config.rules {
            if !rule.matches(sender, receiver) {
                continue;
            }

            debug!(rule_id = %rule.id, sender, receiver, "contract rule matched");

            return match rule.verdict {
                RuleVerdict::Allow => match rule.missing_field(&tx.data) {
                    Some(field) => {
                        warn!(rule_id = %rule.id, field, sender, "required data field missing");
                        ContractDecision::Deny {
                            reason: format!("rule '{}' requires data field '{field}'", rule.id),
                        }
                    }
                    None => ContractDecision::Allow {
                        rule_id: rule.id.clone(),
                    },
                },

                RuleVerdict::Deny => ContractDecision::Deny {
                    reason: rule
                        .deny_reason
                        .clone()
                        .unwrap_or_else(|| format!("denied by rule '{}'", rule.id)),
                },
            };
        }

        warn!(sender, receiver, "no contract rule matched; denying by default");
        ContractDecision::Deny {
            reason: format!(
                "denied by default: no contract rule matched sender '{sender}' to receiver '{receiver}'"
            ),
        }
    }
}

impl ContractRuleChecker for TomlContractRules {
    fn check(&self, tx: &Transaction) -> ChainSecResult<bool> {
        Ok(self.evaluate(tx).is_allowed())
    }
}
