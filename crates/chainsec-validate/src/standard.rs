//! Assembly of the standard five-stage pipeline.

use std::sync::Arc;

use tracing::info;

use chainsec_contracts::error::ChainSecResult;
use chainsec_core::{
    traits::{ChainView, ContractRuleChecker, ReputationView},
    ValidationPipeline,
};

use crate::{
    config::PipelineConfig,
    stages::{ConsensusStage, ContractStage, CryptographicStage, ReputationGateStage, StructuralStage},
};

/// Structural → Cryptographic → Contract → Consensus → Reputation.
///
/// Fails only if `config` does not validate, the structural schema does
/// not compile, or the contract workers cannot be started.
pub fn standard_pipeline(
    chain: Arc<dyn ChainView>,
    reputation: Arc<dyn ReputationView>,
    checker: Arc<dyn ContractRuleChecker>,
    config: &PipelineConfig,
) -> ChainSecResult<ValidationPipeline> {
    config.validate()?;

    let pipeline = ValidationPipeline::new()
        .with_stage("structural", Box::new(StructuralStage::new()?))
        .with_stage("cryptographic", Box::new(CryptographicStage::new()))
        .with_stage(
            "contract",
            Box::new(ContractStage::new(
                checker,
                config.contract_timeout(),
                config.contract_workers,
            )?),
        )
        .with_stage("consensus", Box::new(ConsensusStage::new(chain)))
        .with_stage(
            "reputation",
            Box::new(ReputationGateStage::new(
                reputation,
                config.low_reputation_threshold,
                config.medium_reputation_threshold,
            )),
        );

    info!(
        stages = ?pipeline.stage_names(),
        contract_timeout_ms = config.contract_timeout_ms,
        contract_workers = config.contract_workers,
        "validation pipeline assembled"
    );
    Ok(pipeline)
}
