//! The five validation stages, in pipeline order.
//!
//! | Stage         | Kind             | Counts toward `stages_passed` |
//! |---------------|------------------|-------------------------------|
//! | Structural    | hard             | yes                           |
//! | Cryptographic | hard             | yes                           |
//! | Contract      | hard             | yes                           |
//! | Consensus     | soft             | no                            |
//! | Reputation    | conditional-hard | no                            |

pub mod consensus;
pub mod contract;
pub mod cryptographic;
pub mod reputation;
pub mod structural;

pub use consensus::ConsensusStage;
pub use contract::ContractStage;
pub use cryptographic::CryptographicStage;
pub use reputation::ReputationGateStage;
pub use structural::StructuralStage;

// ── Report messages ──────────────────────────────────────────────────────────

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const MISSING_CRYPTO: &str = "Missing cryptographic elements";
pub const INVALID_SIGNATURE: &str = "Invalid cryptographic signature";
pub const CONTRACT_FAILED: &str = "Smart contract validation failed";
pub const CONSENSUS_PENDING: &str = "Consensus verification pending";
pub const LOW_REPUTATION: &str = "Low reputation agent - additional verification required";
pub const MEDIUM_REPUTATION: &str = "Medium reputation agent - limited privileges";
