//! Pipeline configuration.
//!
//! ```toml
//! contract_timeout_ms = 2000
//! contract_workers = 4
//! low_reputation_threshold = 50
//! medium_reputation_threshold = 70
//! ```
//!
//! Every key is optional; missing keys take the defaults shown.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use chainsec_contracts::error::{ChainSecError, ChainSecResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How long the contract stage waits for the rule checker.
    pub contract_timeout_ms: u64,

    /// Fixed number of threads running contract checks.
    pub contract_workers: usize,

    /// Scores below this are gated: warning plus `valid = false`.
    pub low_reputation_threshold: u8,

    /// Scores below this (and at or above the low threshold) only warn.
    pub medium_reputation_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            contract_timeout_ms: 2000,
            contract_workers: 4,
            low_reputation_threshold: 50,
            medium_reputation_threshold: 70,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> ChainSecResult<Self> {
        let config: PipelineConfig = toml::from_str(s).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to parse pipeline TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ChainSecResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChainSecError::ConfigError {
            reason: format!("failed to read pipeline config '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> ChainSecResult<()> {
        if self.contract_timeout_ms == 0 {
            return Err(ChainSecError::ConfigError {
                reason: "contract_timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.contract_workers == 0 {
            return Err(ChainSecError::ConfigError {
                reason: "contract_workers must be greater than zero".to_string(),
            });
        }
        if self.low_reputation_threshold > self.medium_reputation_threshold
            || self.medium_reputation_threshold > 100
        {
            return Err(ChainSecError::ConfigError {
                reason: format!(
                    "reputation thresholds must satisfy low <= medium <= 100, got {} / {}",
                    self.low_reputation_threshold, self.medium_reputation_threshold
                ),
            });
        }
        Ok(())
    }

    pub fn contract_timeout(&self) -> Duration {
        Duration::from_millis(self.contract_timeout_ms)
    }
}
