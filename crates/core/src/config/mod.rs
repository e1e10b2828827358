use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Algorithm, Result, SortVizError};

/// Smallest accepted step delay in milliseconds.
pub const MIN_DELAY_MS: u64 = 1;
/// Largest accepted step delay in milliseconds.
pub const MAX_DELAY_MS: u64 = 200;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub sequence: SequenceConfig,
    pub pacing: PacingConfig,
    pub algorithm: Algorithm,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            pacing: PacingConfig::default(),
            algorithm: Algorithm::default(),
        }
    }
}

impl AppConfig {
    /// Rejects out-of-range values before they can reach the engine.
    pub fn validate(&self) -> Result<()> {
        self.sequence.validate()?;
        self.pacing.validate()
    }

    /// Loads and validates a JSON preset file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|err| SortVizError::InvalidConfig(format!("malformed preset: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| SortVizError::msg(err.to_string()))
    }
}

/// Configuration for the generated sequence of bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Number of bars in the sequence.
    pub bars: usize,
    /// Values are drawn from `[min_value, max_value)`.
    pub min_value: u32,
    pub max_value: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            bars: 50,
            min_value: 50,
            max_value: 250,
        }
    }
}

impl SequenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bars == 0 {
            return Err(SortVizError::InvalidConfig(
                "sequence must contain at least one bar".to_string(),
            ));
        }
        if self.min_value >= self.max_value {
            return Err(SortVizError::InvalidConfig(format!(
                "value range [{}, {}) is empty",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }
}

/// Configuration for the delay inserted between engine steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    pub delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { delay_ms: 50 }
    }
}

impl PacingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.delay_ms < MIN_DELAY_MS || self.delay_ms > MAX_DELAY_MS {
            return Err(SortVizError::InvalidConfig(format!(
                "step delay {} ms is outside [{MIN_DELAY_MS}, {MAX_DELAY_MS}]",
                self.delay_ms
            )));
        }
        Ok(())
    }
}
