//! Engine configuration.

use crate::error::ConfigError;
use std::str::FromStr;

pub const ENV_HEAP_INITIAL_MB: &str = "PLUGIN_V8_HEAP_INITIAL_MB";
pub const ENV_HEAP_MAX_MB: &str = "PLUGIN_V8_HEAP_MAX_MB";
pub const ENV_ON_COLLISION: &str = "PLUGIN_V8_ON_COLLISION";

/// What to do when a plugin exports a name that another plugin already owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Later registrations replace earlier ones (a warning is logged).
    #[default]
    Overwrite,
    /// The registration fails with [`crate::PluginError::DuplicateExport`].
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(CollisionPolicy::Overwrite),
            "reject" => Ok(CollisionPolicy::Reject),
            _ => Err(ConfigError::InvalidValue {
                key: "collision policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Isolate limits and registration behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub heap_initial_mb: usize,
    pub heap_max_mb: usize,
    pub collision: CollisionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heap_initial_mb: 1,
            heap_max_mb: 128,
            collision: CollisionPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `PLUGIN_V8_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HEAP_INITIAL_MB) {
            config.heap_initial_mb = parse_mb(ENV_HEAP_INITIAL_MB, &value)?;
        }

        if let Some(value) = lookup(ENV_HEAP_MAX_MB) {
            config.heap_max_mb = parse_mb(ENV_HEAP_MAX_MB, &value)?;
        }

        if let Some(value) = lookup(ENV_ON_COLLISION) {
            config.collision = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_ON_COLLISION.to_string(),
                value: value.clone(),
            })?;
        }

        if config.heap_initial_mb > config.heap_max_mb {
            return Err(ConfigError::InvalidValue {
                key: ENV_HEAP_INITIAL_MB.to_string(),
                value: format!(
                    "{} (exceeds heap max of {} MB)",
                    config.heap_initial_mb, config.heap_max_mb
                ),
            });
        }

        Ok(config)
    }

    pub(crate) fn heap_limits_bytes(&self) -> (usize, usize) {
        (
            self.heap_initial_mb * 1024 * 1024,
            self.heap_max_mb * 1024 * 1024,
        )
    }
}

fn parse_mb(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(mb) if mb > 0 => Ok(mb),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
