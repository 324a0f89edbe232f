//! Node configuration file.
//!
//! ```toml
//! [pipeline]
//! contract_timeout_ms = 2000
//! low_reputation_threshold = 50
//! medium_reputation_threshold = 70
//!
//! [reputation]
//! success = 45.0
//! accuracy = 30.0
//! speed = 15.0
//! peer = 10.0
//! speed_half_life_ms = 1000.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use chainsec_contracts::error::{ChainSecError, ChainSecResult};
use chainsec_reputation::ReputationWeights;
use chainsec_validate::PipelineConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub pipeline: PipelineConfig,
    pub reputation: ReputationWeights,
}

impl NodeConfig {
    /// Parse and validate.  Returns `ConfigError` on any problem.
    pub fn from_toml_str(s: &str) -> ChainSecResult<Self> {
        let config: NodeConfig = toml::from_str(s).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to parse node TOML: {e}"),
        })?;
        config.pipeline.validate()?;
        config.reputation.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ChainSecResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to read node config '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }
}
