//! Core trait definitions for the ChainSec validation pipeline.
//!
//! These four traits define every seam the pipeline touches:
//!
//! - `ValidationStage`     : one ordered check over a transaction
//! - `ContractRuleChecker` : external rule engine (may block or time out)
//! - `ChainView`           : read access to the ledger tip
//! - `ReputationView`      : read access to sender reputation scores
//!
//! The ledger and reputation store implement the two views; tests substitute
//! fakes for any of them without touching pipeline logic.

use chainsec_contracts::{
    agent::AgentId,
    error::ChainSecResult,
    report::StageOutcome,
    transaction::{Hash, Transaction},
};

/// A single check in the validation pipeline.
///
/// Stages are pure from the pipeline's point of view: they inspect the
/// transaction (and whatever read-only views they were built with) and
/// report an outcome.  They never mutate ledger or reputation state.
pub trait ValidationStage: Send + Sync {
    /// Evaluate `tx` and report what this stage concluded.
    ///
    /// Failures are expressed as `StageOutcome::Rejected`, never as panics
    /// or errors; the pipeline always produces a report.
    fn evaluate(&self, tx: &Transaction) -> StageOutcome;
}

/// The external contract-based rule check.
///
/// Implementations may be in-memory rule sets, test fakes, or clients for a
/// contract network.  The pipeline calls this on a worker thread with an
/// explicit timeout, so implementations are free to block.
pub trait ContractRuleChecker: Send + Sync {
    /// Return `Ok(true)` when the contract accepts the transaction.
    ///
    /// `Ok(false)`, any `Err`, and a timeout are all treated as a hard
    /// failure of the contract stage.
    fn check(&self, tx: &Transaction) -> ChainSecResult<bool>;
}

/// Read access to the chain tip, used by the advisory consensus stage.
pub trait ChainView: Send + Sync {
    /// Hash of the last finalized block.
    fn tip_hash(&self) -> ChainSecResult<Hash>;
}

/// Read access to sender reputation, used by the reputation gate.
pub trait ReputationView: Send + Sync {
    /// Derived reputation score in `[0, 100]`.  Unknown agents score 0.
    fn score(&self, agent_id: &AgentId) -> ChainSecResult<u8>;
}
