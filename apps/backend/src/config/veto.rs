use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Runtime knobs for veto rooms, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VetoConfig {
    /// Smallest accepted map pool.
    pub min_pool_size: usize,
    /// Largest accepted map pool.
    pub max_pool_size: usize,
    /// Read-validate-commit attempts before reporting an optimistic lock conflict.
    pub cas_max_attempts: u32,
    /// Per-room notification buffer; slow subscribers skip ahead past this.
    pub event_channel_capacity: usize,
}

impl Default for VetoConfig {
    fn default() -> Self {
        Self {
            min_pool_size: 1,
            max_pool_size: 16,
            cas_max_attempts: 3,
            event_channel_capacity: 64,
        }
    }
}

impl VetoConfig {
    /// Load from `VETO_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            min_pool_size: parse_var("VETO_MIN_POOL_SIZE", defaults.min_pool_size)?,
            max_pool_size: parse_var("VETO_MAX_POOL_SIZE", defaults.max_pool_size)?,
            cas_max_attempts: parse_var("VETO_CAS_MAX_ATTEMPTS", defaults.cas_max_attempts)?,
            event_channel_capacity: parse_var(
                "VETO_EVENT_CHANNEL_CAPACITY",
                defaults.event_channel_capacity,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_pool_size == 0 {
            return Err(AppError::config("VETO_MIN_POOL_SIZE must be at least 1"));
        }
        if self.min_pool_size > self.max_pool_size {
            return Err(AppError::config(format!(
                "VETO_MIN_POOL_SIZE ({}) exceeds VETO_MAX_POOL_SIZE ({})",
                self.min_pool_size, self.max_pool_size
            )));
        }
        if self.cas_max_attempts == 0 {
            return Err(AppError::config("VETO_CAS_MAX_ATTEMPTS must be at least 1"));
        }
        if self.event_channel_capacity == 0 {
            return Err(AppError::config(
                "VETO_EVENT_CHANNEL_CAPACITY must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Parse an optional environment variable, using `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has invalid value '{raw}'"
            ))
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}
