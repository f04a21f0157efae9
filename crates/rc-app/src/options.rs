//! Session tuning, loadable from YAML.

use std::path::Path;
use std::time::Duration;

use rc_sim::ParticleConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Where configuration requests go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteOptions {
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 10_000,
        }
    }
}

impl RemoteOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub max_lives: u8,
    /// Delay between data-table rows.
    pub table_interval_ms: u64,
    /// Delay before retrying a tick whose state was missing.
    pub retry_interval_ms: u64,
    /// Delay before clearing the table after a full revolution.
    pub clear_delay_ms: u64,
    pub frame_interval_ms: u64,
    pub particles: ParticleConfig,
    pub remote: RemoteOptions,
    /// Fixed seed for particle spawning; random when absent.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_lives: 3,
            table_interval_ms: 4000,
            retry_interval_ms: 100,
            clear_delay_ms: 2000,
            frame_interval_ms: 16,
            particles: ParticleConfig::default(),
            remote: RemoteOptions::default(),
            seed: None,
        }
    }
}

/// Longest accepted interval or delay: one hour.
const MAX_INTERVAL_MS: u64 = 3_600_000;

impl SessionOptions {
    pub fn table_interval(&self) -> Duration {
        Duration::from_millis(self.table_interval_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_lives == 0 {
            return Err(AppError::Options("max_lives must be at least 1".to_string()));
        }
        for (name, value) in [
            ("table_interval_ms", self.table_interval_ms),
            ("retry_interval_ms", self.retry_interval_ms),
            ("frame_interval_ms", self.frame_interval_ms),
        ] {
            if value == 0 {
                return Err(AppError::Options(format!("{name} must be positive")));
            }
        }
        for (name, value) in [
            ("table_interval_ms", self.table_interval_ms),
            ("retry_interval_ms", self.retry_interval_ms),
            ("clear_delay_ms", self.clear_delay_ms),
            ("frame_interval_ms", self.frame_interval_ms),
        ] {
            if value > MAX_INTERVAL_MS {
                return Err(AppError::Options(format!(
                    "{name} must be at most {MAX_INTERVAL_MS} ms, got {value}"
                )));
            }
        }
        self.particles.validate()?;
        Ok(())
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let options: SessionOptions = serde_yaml::from_str(content)
            .map_err(|e| AppError::Options(format!("Failed to parse options YAML: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }
}
