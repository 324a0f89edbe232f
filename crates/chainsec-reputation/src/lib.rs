//! # chainsec-reputation
//!
//! Per-agent reputation for the ChainSec validation pipeline.
//!
//! Every validated transaction folds one `TaskOutcome` into its sender's
//! `ReputationRecord`.  The `[0, 100]` score is derived on read through
//! `ReputationWeights` and fed back into the pipeline's reputation gate via
//! the `ReputationView` trait.
//!
//! ```rust,ignore
//! use chainsec_reputation::{ReputationStore, TaskOutcome};
//!
//! let store = ReputationStore::new();
//! store.update(&agent_id, TaskOutcome::new(true, 12.0, 100.0))?;
//! let snapshot = store.get_reputation(&agent_id)?;
//! ```

pub mod monitor;
pub mod record;
pub mod score;
pub mod store;

pub use monitor::{ReputationMonitor, DEFAULT_LOW_PERFORMER_THRESHOLD};
pub use record::{ReputationRecord, ReputationSnapshot, TaskOutcome, MAX_RESPONSE_TIME_MS};
pub use score::ReputationWeights;
pub use store::ReputationStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
