//! The ChainSec validation pipeline: a fixed-order stage runner.
//!
//! The pipeline enforces the validation model:
//!
//!   Structural → Cryptographic → Contract → Consensus → Reputation
//!
//! Stages run in the order they were added.  A `Rejected` outcome stops the
//! run immediately; `Advisory` outcomes add warnings (and may invalidate)
//! but never stop it.  Only `Passed` outcomes count toward `stages_passed`,
//! so purely advisory stages never inflate the tally.
//!
//! The pipeline holds no mutable state and takes `&self`, so one instance
//! can validate many transactions in parallel.

use tracing::{debug, warn};

use chainsec_contracts::{
    report::{StageOutcome, ValidationReport},
    transaction::Transaction,
};

use crate::traits::ValidationStage;

struct NamedStage {
    name: String,
    stage: Box<dyn ValidationStage>,
}

/// An ordered list of validation stages.
///
/// Build one at startup, share it behind an `Arc`, and call `validate()`
/// from as many validator threads as needed.
#[derive(Default)]
pub struct ValidationPipeline {
    stages: Vec<NamedStage>,
}

impl ValidationPipeline {
    /// Create an empty pipeline.  An empty pipeline accepts everything.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append `stage` to the end of the pipeline under `name`.
    pub fn with_stage(mut self, name: impl Into<String>, stage: Box<dyn ValidationStage>) -> Self {
        self.push_stage(name, stage);
        self
    }

    pub fn push_stage(&mut self, name: impl Into<String>, stage: Box<dyn ValidationStage>) {
        self.stages.push(NamedStage {
            name: name.into(),
            stage,
        });
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Run every stage over `tx` and produce a report.
    ///
    /// # Pipeline
    ///
    /// For each stage in order:
    /// - `Passed` → increment `stages_passed`, continue
    /// - `Rejected { error }` → record `error`, set `valid = false`, return
    /// - `Advisory { warning, invalidate }` → record `warning` if any, set
    ///   `valid = false` if `invalidate`, continue
    ///
    /// Always returns a report; stage failures never escape as errors.
    pub fn validate(&self, tx: &Transaction) -> ValidationReport {
        let mut report = ValidationReport::new();

        debug!(
            sender = %tx.sender,
            nonce = tx.nonce,
            stage_count = self.stages.len(),
            "validation starting"
        );

        for named in &self.stages {
            match named.stage.evaluate(tx) {
                StageOutcome::Passed => {
                    report.stages_passed += 1;
                    debug!(stage = %named.name, sender = %tx.sender, "stage passed");
                }

                StageOutcome::Rejected { error } => {
                    warn!(
                        stage = %named.name,
                        sender = %tx.sender,
                        nonce = tx.nonce,
                        error = %error,
                        "stage rejected transaction"
                    );
                    report.valid = false;
                    report.errors.push(error);
                    return report;
                }

                StageOutcome::Advisory { warning, invalidate } => {
                    if let Some(warning) = warning {
                        debug!(stage = %named.name, sender = %tx.sender, %warning, "stage warning");
                        report.warnings.push(warning);
                    }
                    if invalidate {
                        report.valid = false;
                    }
                }
            }
        }

        debug!(
            sender = %tx.sender,
            valid = report.valid,
            stages_passed = report.stages_passed,
            warning_count = report.warnings.len(),
            "validation complete"
        );

        report
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
