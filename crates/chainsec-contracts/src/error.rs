//! Error types for the ChainSec ledger and validation pipeline.
//!
//! Validation-stage failures normally never surface as `Err`: the pipeline
//! captures them in a `ValidationReport`.  The stage variants exist for the
//! collaborators behind the stages (contract checkers, key handling) and for
//! callers that want to turn a report into a typed error.  Ledger-integrity
//! variants are always returned to the caller.

use thiserror::Error;

/// The unified error type for ChainSec.
#[derive(Debug, Error)]
pub enum ChainSecError {
    /// The transaction is missing required fields or is otherwise malformed.
    #[error("structural error: {reason}")]
    Structural { reason: String },

    /// A signature or public key is missing or does not verify.
    #[error("cryptographic error: {reason}")]
    Cryptographic { reason: String },

    /// The external contract rule checker refused the transaction or failed.
    #[error("contract check failed: {reason}")]
    ContractCheck { reason: String },

    /// The external contract rule checker did not answer in time.
    #[error("contract check timed out after {timeout_ms} ms")]
    ContractTimeout { timeout_ms: u64 },

    /// The sender's reputation is too low for the transaction to be accepted.
    #[error("reputation gate: agent '{agent_id}' scored {score}")]
    ReputationGate { agent_id: String, score: u8 },

    /// `(sender, nonce)` is already present in the pending pool or a block.
    #[error("duplicate nonce {nonce} for sender '{sender}'")]
    DuplicateNonce { sender: String, nonce: u64 },

    /// A transaction id is not in the pending pool.
    #[error("unknown transaction '{tx_id}'")]
    UnknownTx { tx_id: String },

    /// A pending transaction is leased to a different validator.
    #[error("transaction '{tx_id}' is claimed by validator {holder}")]
    ClaimConflict { tx_id: String, holder: String },

    /// Stored block hashes or linkage do not verify.
    #[error("broken hash chain: {reason}")]
    BrokenChain { reason: String },

    /// A key could not be decoded.
    ///
    /// Fatal for the calling agent's setup, never for the ledger.
    #[error("key format error: {reason}")]
    KeyFormat { reason: String },

    /// The agent has no signing key configured.
    #[error("agent '{agent_id}' has no private key configured")]
    NoPrivateKey { agent_id: String },

    /// A value could not be canonically serialized.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Ledger state could not be read from or written to storage.
    #[error("persistence error: {reason}")]
    Persistence { reason: String },

    /// A lock guarding shared state was poisoned by a panicking holder.
    #[error("lock poisoned: {resource}")]
    LockPoisoned { resource: String },
}

/// Convenience alias used throughout the ChainSec crates.
pub type ChainSecResult<T> = Result<T, ChainSecError>;
