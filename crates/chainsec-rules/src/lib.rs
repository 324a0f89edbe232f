//! # chainsec-rules
//!
//! A TOML-driven, deny-by-default `ContractRuleChecker`.
//!
//! The validation pipeline's contract stage normally talks to an external
//! contract network.  `TomlContractRules` stands in for it in-process: rules
//! are declared in a TOML file, evaluated in order, and the first match
//! wins.  A transaction no rule matches is denied.
//!
//! ```rust,ignore
//! use chainsec_rules::TomlContractRules;
//!
//! let rules = TomlContractRules::from_toml_str(include_str!("contract.toml"))?;
//! let allowed = rules.check(&tx)?;
//! ```

pub mod engine;
pub mod rule;

pub use engine::{ContractDecision, TomlContractRules};
pub use rule::{ContractRule, RuleSetConfig, RuleVerdict};

// ── Tests ─────────────────────────────────────────────────────────────────────
