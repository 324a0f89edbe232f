//! Agent and validator identity types.
//!
//! ChainSec does not prescribe how agents reason or which tools they call.
//! It only needs a stable name for whoever signs a transaction and for
//! whoever validates it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, human-readable identifier for an agent.
///
/// Used as the transaction `sender`/`receiver`, as the replay-protection key
/// together with the nonce, and as the key into the reputation store.
/// Example: `AgentId("TaskAgent-v1")`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no name at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for one validator instance.
///
/// A validator holds claims on pending transactions under this id, so two
/// validators working the same pool can be told apart in logs and leases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorId(pub uuid::Uuid);

impl ValidatorId {
    /// Create a new, unique validator ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ValidatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
