//! Demo scenarios.
//!
//! Each scenario builds a `ChainSecNode` from scratch with the default
//! contract rules, drives it through one story, and prints what happened.

pub mod replay_protection;
pub mod reputation_recovery;
pub mod tamper_detection;
