//! Agent signing identities.

use std::fmt;

use chainsec_contracts::{
    agent::AgentId,
    error::{ChainSecError, ChainSecResult},
};
use chainsec_crypto::{derive_public_key, generate_private_key, sign};

/// An agent name plus, optionally, the private key it signs with.
///
/// `Debug` never prints the key.
#[derive(Clone)]
pub struct AgentIdentity {
    agent_id: AgentId,
    private_key: Option<String>,
}

impl AgentIdentity {
    /// A new identity with a freshly generated key.
    pub fn generate(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            private_key: Some(generate_private_key()),
        }
    }

    /// An identity for an existing hex private key.
    ///
    /// Returns `KeyFormat` if the key does not decode.
    pub fn from_private_key(agent_id: impl Into<AgentId>, private_key: &str) -> ChainSecResult<Self> {
        derive_public_key(private_key)?;
        Ok(Self {
            agent_id: agent_id.into(),
            private_key: Some(private_key.trim().to_string()),
        })
    }

    /// An identity that can be named but cannot sign.
    pub fn without_key(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            private_key: None,
        }
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    pub fn can_sign(&self) -> bool {
        self.private_key.is_some()
    }

    fn private_key(&self) -> ChainSecResult<&str> {
        self.private_key
            .as_deref()
            .ok_or_else(|| ChainSecError::NoPrivateKey {
                agent_id: self.agent_id.to_string(),
            })
    }

    /// Hex public key, or `NoPrivateKey`.
    pub fn public_key(&self) -> ChainSecResult<String> {
        derive_public_key(self.private_key()?)
    }

    pub fn sign(&self, payload: &[u8]) -> ChainSecResult<Vec<u8>> {
        sign(self.private_key()?, payload)
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("agent_id", &self.agent_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
