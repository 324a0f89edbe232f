//! Validator node: drains the pending pool through the pipeline.
//!
//! One `process_pending` run:
//!
//!   1. claim the oldest unclaimed pending transaction;
//!   2. validate it outside the ledger lock, timing the run;
//!   3. rejected → discard from the pool, keep a `RejectionRecord`, and
//!      record a failed task for the sender;
//!   4. repeat until nothing is left to claim;
//!   5. finalize every accepted transaction into one block, in validation
//!      order, then record a successful task for each sender.
//!
//! Several validators may share one ledger; claims keep them from ever
//! processing the same transaction twice.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use tracing::{info, warn};

use chainsec_contracts::{
    agent::{AgentId, ValidatorId},
    error::{ChainSecError, ChainSecResult},
    report::{RejectionRecord, ValidationReport},
    transaction::{Transaction, TxId},
};
use chainsec_core::{
    traits::{ChainView, ContractRuleChecker},
    ValidationPipeline,
};
use chainsec_ledger::{Block, Ledger};
use chainsec_reputation::{ReputationStore, TaskOutcome};
use chainsec_validate::{standard_pipeline, PipelineConfig};

/// What one `process_pending` run did.
#[derive(Debug, Clone, Default)]
pub struct ProcessSummary {
    pub accepted: Vec<TxId>,
    pub rejected: Vec<TxId>,

    /// The block holding `accepted`, if any were accepted.
    pub block: Option<Block>,
}

impl ProcessSummary {
    pub fn processed(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

/// An accepted transaction waiting for the end-of-run block.
struct Held {
    tx_id: TxId,
    sender: AgentId,
    elapsed_ms: f64,
    validation_score: u8,
}

pub struct ValidatorNode {
    id: ValidatorId,
    ledger: Arc<Ledger>,
    reputation: Arc<ReputationStore>,
    pipeline: ValidationPipeline,
    rejections: Mutex<Vec<RejectionRecord>>,
}

impl ValidatorNode {
    /// A validator running the standard five-stage pipeline.
    pub fn new(
        ledger: Arc<Ledger>,
        reputation: Arc<ReputationStore>,
        checker: Arc<dyn ContractRuleChecker>,
        config: &PipelineConfig,
    ) -> ChainSecResult<Self> {
        let chain: Arc<dyn ChainView> = ledger.clone();
        let pipeline = standard_pipeline(chain, reputation.clone(), checker, config)?;
        Ok(Self::with_pipeline(ledger, reputation, pipeline))
    }

    pub fn with_pipeline(
        ledger: Arc<Ledger>,
        reputation: Arc<ReputationStore>,
        pipeline: ValidationPipeline,
    ) -> Self {
        Self {
            id: ValidatorId::new(),
            ledger,
            reputation,
            pipeline,
            rejections: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> ValidatorId {
        self.id
    }

    /// Run the pipeline without touching the ledger or reputation.
    pub fn validate(&self, tx: &Transaction) -> ValidationReport {
        self.pipeline.validate(tx)
    }

    /// Validate everything currently claimable and apply the outcomes.
    pub fn process_pending(&self) -> ChainSecResult<ProcessSummary> {
        let mut summary = ProcessSummary::default();
        let mut held: Vec<Held> = Vec::new();

        if let Err(e) = self.drain(&mut held, &mut summary) {
            self.release_all(&held);
            return Err(e);
        }

        if held.is_empty() {
            return Ok(summary);
        }

        let ids: Vec<TxId> = held.iter().map(|h| h.tx_id.clone()).collect();
        let block = match self.ledger.finalize_block(&ids, self.id) {
            Ok(block) => block,
            Err(e) => {
                self.release_all(&held);
                return Err(e);
            }
        };

        // Best effort once the block is committed.
        credit_accepted(&held, |sender, outcome| self.reputation.update(sender, outcome));

        info!(
            validator = %self.id,
            block_index = block.index,
            accepted = ids.len(),
            rejected = summary.rejected.len(),
            "pending pool processed"
        );

        summary.accepted = ids;
        summary.block = Some(block);
        Ok(summary)
    }

    fn drain(&self, held: &mut Vec<Held>, summary: &mut ProcessSummary) -> ChainSecResult<()> {
        while let Some((tx_id, tx)) = self.ledger.claim_next(self.id)? {
            let started = Instant::now();
            let report = self.pipeline.validate(&tx);
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            if report.valid {
                held.push(Held {
                    tx_id,
                    sender: tx.sender,
                    elapsed_ms,
                    validation_score: report.validation_score(),
                });
            } else {
                self.reject(&tx_id, &tx.sender, &report, elapsed_ms)?;
                summary.rejected.push(tx_id);
            }
        }
        Ok(())
    }

    fn reject(
        &self,
        tx_id: &TxId,
        sender: &AgentId,
        report: &ValidationReport,
        elapsed_ms: f64,
    ) -> ChainSecResult<()> {
        self.ledger.discard(tx_id, self.id)?;

        warn!(
            validator = %self.id,
            tx_id = %tx_id,
            sender = %sender,
            errors = ?report.errors,
            warnings = ?report.warnings,
            "transaction rejected"
        );

        self.rejections
            .lock()
            .map_err(|e| ChainSecError::LockPoisoned {
                resource: format!("rejection log: {e}"),
            })?
            .push(RejectionRecord::from_report(tx_id.clone(), sender.clone(), report));

        self.reputation.update(
            sender,
            TaskOutcome::new(false, elapsed_ms, f64::from(report.validation_score())),
        )?;
        Ok(())
    }

    fn release_all(&self, held: &[Held]) {
        for h in held {
            if let Err(e) = self.ledger.release(&h.tx_id, self.id) {
                warn!(tx_id = %h.tx_id, error = %e, "failed to release claim");
            }
        }
    }

    /// Every rejection this validator has made, oldest first.
    pub fn rejections(&self) -> ChainSecResult<Vec<RejectionRecord>> {
        Ok(self
            .rejections
            .lock()
            .map_err(|e| ChainSecError::LockPoisoned {
                resource: format!("rejection log: {e}"),
            })?
            .clone())
    }
}

/// Record a successful task for every accepted sender, logging and skipping
/// any update that fails.  Returns how many were credited.
fn credit_accepted<F>(held: &[Held], mut update: F) -> usize
where
    F: FnMut(&AgentId, TaskOutcome) -> ChainSecResult<u8>,
{
    let mut credited = 0;
    for h in held {
        let outcome = TaskOutcome::new(true, h.elapsed_ms, f64::from(h.validation_score));
        match update(&h.sender, outcome) {
            Ok(_) => credited += 1,
            Err(e) => warn!(
                tx_id = %h.tx_id,
                sender = %h.sender,
                error = %e,
                "failed to credit accepted transaction"
            ),
        }
    }
    credited
}
