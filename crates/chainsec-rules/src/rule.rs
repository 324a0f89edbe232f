//! Contract rule types and configuration schema.
//!
//! A `RuleSetConfig` is deserialized from TOML and holds an ordered list of
//! `ContractRule`s.  Rules are evaluated in declaration order and the first
//! matching rule wins.  If no rule matches, the checker denies by default.

use serde::{Deserialize, Serialize};

/// What a matching rule decides.
///
/// ```toml
/// verdict = "allow"
/// verdict = "deny"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVerdict {
    Allow,
    Deny,
}

/// A single contract rule loaded from TOML.
///
/// `sender` and `receiver` are exact agent names or the wildcard `"*"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRule {
    /// Stable identifier used in logs and deny reasons.
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub sender: String,

    pub receiver: String,

    /// Top-level keys the transaction's `data` object must carry.  An
    /// `allow` rule whose required fields are missing denies instead.
    #[serde(default)]
    pub required_data_fields: Vec<String>,

    pub verdict: RuleVerdict,

    pub deny_reason: Option<String>,
}

impl ContractRule {
    /// True if both the sender and receiver patterns match.
    pub fn matches(&self, sender: &str, receiver: &str) -> bool {
        let sender_matches = self.sender == "*" || self.sender == sender;
        let receiver_matches = self.receiver == "*" || self.receiver == receiver;
        sender_matches && receiver_matches
    }

    /// The first required field absent from `data`, if any.
    pub fn missing_field<'a>(&'a self, data: &serde_json::Value) -> Option<&'a str> {
        self.required_data_fields
            .iter()
            .find(|field| data.get(field.as_str()).is_none())
            .map(String::as_str)
    }
}

/// The top-level structure of a contract rules file.
///
/// ```toml
/// [[rules]]
/// id = "network-tasks"
/// sender = "*"
/// receiver = "Network"
/// required_data_fields = ["task", "result"]
/// verdict = "allow"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Ordered list of rules.  First match wins.
    #[serde(default)]
    pub rules: Vec<ContractRule>,
}
