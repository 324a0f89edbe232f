//! # chainsec-node
//!
//! The ChainSec agent ledger assembled into a runnable node.
//!
//! - `AgentIdentity`: an agent name plus its Ed25519 signing key.
//! - `TransactionBuilder`: nonces, chain position and signature for every
//!   transaction an agent submits.
//! - `ValidatorNode`: claims pending transactions, runs the five-stage
//!   pipeline, finalizes accepted ones into blocks and feeds every outcome
//!   back into reputation.
//! - `ChainSecNode`: all of the above over one shared ledger.
//!
//! The `scenarios` module holds the end-to-end stories the demo CLI runs.

pub mod builder;
pub mod config;
pub mod identity;
pub mod node;
pub mod scenarios;
pub mod validator;

pub use builder::{NonceGenerator, TransactionBuilder, NETWORK_RECEIVER};
pub use config::NodeConfig;
pub use identity::AgentIdentity;
pub use node::{ChainSecNode, DEFAULT_CONTRACT_RULES};
pub use validator::{ProcessSummary, ValidatorNode};

// ── Tests ─────────────────────────────────────────────────────────────────────
