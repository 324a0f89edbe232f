//! # chainsec-ledger
//!
//! Append-only, SHA-256 hash-chained block ledger with a pending pool.
//!
//! ## Overview
//!
//! Agents submit signed transactions into the pending pool.  Validators
//! claim them, run the validation pipeline outside the ledger lock, and then
//! either finalize the accepted ones into a new `Block` or discard the
//! rejected ones.  Each block links to the previous block via its SHA-256
//! hash; tampering with any block, even a single byte of one transaction,
//! breaks the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chainsec_ledger::Ledger;
//!
//! let ledger = Ledger::new();
//! let tx_id = ledger.submit(signed_tx)?;
//! let block = ledger.finalize_block(&[tx_id], validator_id)?;
//! assert!(ledger.verify_chain());
//! ```

pub mod block;
pub mod chain;
pub mod ledger;
pub mod snapshot;

pub use block::Block;
pub use chain::{hash_block, transaction_id, verify_chain};
pub use ledger::Ledger;
pub use snapshot::LedgerSnapshot;

// ── Tests ─────────────────────────────────────────────────────────────────────
