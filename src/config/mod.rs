use http::uri::Authority;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEBUG_VAR: &str = "DEBUG";
pub const HOST_PREFIX_VAR: &str = "HOST_PREFIX";
pub const REPLICAS_VAR: &str = "REPLICAS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("REPLICAS must be a positive integer, got {0:?}")]
    InvalidReplicas(String),

    #[error("HOST_PREFIX {0:?} does not form a valid host name")]
    InvalidHostPrefix(String),

    #[error("failed to read tuning file {path}: {source}")]
    ReadTuning {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning file {path}: {source}")]
    ParseTuning {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("min_pause_ms ({min}) is greater than max_pause_ms ({max})")]
    InvertedPause { min: u64, max: u64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Process-wide settings, built once before the request loop starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub host_prefix: String,
    pub replicas: NonZeroU32,
    pub debug: bool,
    pub tuning: Tuning,
}

/// Knobs with defaults matching the stock rideshare deployment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub warmup_seconds: u64,
    pub port: u16,
    pub request_timeout_ms: u64,
    pub min_pause_ms: u64,
    pub max_pause_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            warmup_seconds: 10,
            port: 5000,
            request_timeout_ms: 5000,
            min_pause_ms: 200,
            max_pause_ms: 400,
        }
    }
}

impl Tuning {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadTuning {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parses tuning text; `origin` names the source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(content).map_err(|source| ConfigError::ParseTuning {
            path: origin.to_string(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Zero("port"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Zero("request_timeout_ms"));
        }
        if self.max_pause_ms == 0 {
            return Err(ConfigError::Zero("max_pause_ms"));
        }
        if self.min_pause_ms > self.max_pause_ms {
            return Err(ConfigError::InvertedPause {
                min: self.min_pause_ms,
                max: self.max_pause_ms,
            });
        }
        Ok(())
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_secs(self.warmup_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn pause_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_pause_ms),
            Duration::from_millis(self.max_pause_ms),
        )
    }
}

impl Config {
    pub fn from_env(tuning: Tuning) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), tuning)
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F, tuning: Tuning) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = lookup(DEBUG_VAR).ok_or(ConfigError::Missing(DEBUG_VAR))? == "1";
        let host_prefix = lookup(HOST_PREFIX_VAR).ok_or(ConfigError::Missing(HOST_PREFIX_VAR))?;
        let raw_replicas = lookup(REPLICAS_VAR).ok_or(ConfigError::Missing(REPLICAS_VAR))?;

        let replicas = raw_replicas
            .parse::<NonZeroU32>()
            .map_err(|_| ConfigError::InvalidReplicas(raw_replicas.clone()))?;

        // replica hosts differ only by their numeric suffix
        if host_prefix.is_empty()
            || format!("{}-1:{}", host_prefix, tuning.port)
                .parse::<Authority>()
                .is_err()
        {
            return Err(ConfigError::InvalidHostPrefix(host_prefix));
        }

        tuning.validate()?;

        Ok(Self {
            host_prefix,
            replicas,
            debug,
            tuning,
        })
    }

    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "rideshare_loadgen=debug,info"
        } else {
            "warn"
        }
    }
}
