//! A complete single-process node: one ledger, one reputation store, one
//! builder and one validator, wired from a `NodeConfig`.

use std::{path::Path, sync::Arc};

use chainsec_contracts::error::ChainSecResult;
use chainsec_core::traits::ContractRuleChecker;
use chainsec_ledger::Ledger;
use chainsec_reputation::{ReputationMonitor, ReputationStore};
use chainsec_rules::TomlContractRules;

use crate::{builder::TransactionBuilder, config::NodeConfig, validator::ValidatorNode};

/// Contract rules shipped with the node.
pub const DEFAULT_CONTRACT_RULES: &str = include_str!("../rules/contract.toml");

pub struct ChainSecNode {
    ledger: Arc<Ledger>,
    reputation: Arc<ReputationStore>,
    builder: TransactionBuilder,
    validator: ValidatorNode,
}

impl ChainSecNode {
    /// A node over a fresh ledger.
    pub fn new(config: &NodeConfig, checker: Arc<dyn ContractRuleChecker>) -> ChainSecResult<Self> {
        Self::with_ledger(Ledger::new(), config, checker)
    }

    /// A node over a fresh ledger using `DEFAULT_CONTRACT_RULES`.
    pub fn with_default_rules(config: &NodeConfig) -> ChainSecResult<Self> {
        let rules = TomlContractRules::from_toml_str(DEFAULT_CONTRACT_RULES)?;
        Self::new(config, Arc::new(rules))
    }

    /// A node over an existing ledger, e.g. one reloaded from disk.
    ///
    /// Reputation is not persisted and starts empty.
    pub fn with_ledger(
        ledger: Ledger,
        config: &NodeConfig,
        checker: Arc<dyn ContractRuleChecker>,
    ) -> ChainSecResult<Self> {
        let ledger = Arc::new(ledger);
        let reputation = Arc::new(ReputationStore::with_weights(config.reputation.clone())?);
        let builder = TransactionBuilder::new(Arc::clone(&ledger));
        let validator = ValidatorNode::new(
            Arc::clone(&ledger),
            Arc::clone(&reputation),
            checker,
            &config.pipeline,
        )?;
        Ok(Self {
            ledger,
            reputation,
            builder,
            validator,
        })
    }

    /// Load the ledger at `path` and build a node over it.
    pub fn load(path: &Path, config: &NodeConfig, checker: Arc<dyn ContractRuleChecker>) -> ChainSecResult<Self> {
        Self::with_ledger(Ledger::load_from_file(path)?, config, checker)
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn reputation(&self) -> &Arc<ReputationStore> {
        &self.reputation
    }

    pub fn builder(&self) -> &TransactionBuilder {
        &self.builder
    }

    pub fn validator(&self) -> &ValidatorNode {
        &self.validator
    }

    pub fn monitor(&self) -> ReputationMonitor {
        ReputationMonitor::new(Arc::clone(&self.reputation))
    }
}
