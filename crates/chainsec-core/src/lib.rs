//! # chainsec-core
//!
//! The trait seams and ordered validation pipeline for the ChainSec ledger.
//!
//! This crate provides:
//! - The four seam traits (`ValidationStage`, `ContractRuleChecker`,
//!   `ChainView`, `ReputationView`)
//! - The `ValidationPipeline` that runs stages in a fixed order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chainsec_core::{ValidationPipeline, traits::ValidationStage};
//!
//! let pipeline = ValidationPipeline::new()
//!     .with_stage("structural", Box::new(StructuralStage::new()?));
//! let report = pipeline.validate(&tx);
//! ```

pub mod pipeline;
pub mod traits;

pub use pipeline::ValidationPipeline;
