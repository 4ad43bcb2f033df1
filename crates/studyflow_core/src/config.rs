//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Hold tunables shared by agenda, retrieval and delivery services.
//! - Build them from `STUDYFLOW_*` environment variables with fallbacks.
//!
//! # Invariants
//! - A constructed `CoreConfig` is always valid: non-zero lookahead, top-k
//!   and chunk size, and `chunk_overlap < chunk_size`.
//! - Unset keys fall back to defaults; set but malformed keys are errors.

use crate::logging::default_log_level;
use crate::model::window::DEFAULT_LOOKAHEAD_DAYS;
use crate::retrieval::chunking::{ChunkError, ChunkSpec, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::schedule::zone::{LocalZone, ZoneError};
use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_LOOKAHEAD_DAYS: &str = "STUDYFLOW_LOOKAHEAD_DAYS";
pub const ENV_TIMEZONE: &str = "STUDYFLOW_TIMEZONE";
pub const ENV_TOP_K: &str = "STUDYFLOW_TOP_K";
pub const ENV_CHUNK_SIZE: &str = "STUDYFLOW_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "STUDYFLOW_CHUNK_OVERLAP";
pub const ENV_EMAIL_LOOKBACK_DAYS: &str = "STUDYFLOW_EMAIL_LOOKBACK_DAYS";
pub const ENV_DRY_RUN: &str = "STUDYFLOW_DRY_RUN";
pub const ENV_LOG_LEVEL: &str = "STUDYFLOW_LOG_LEVEL";

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_EMAIL_LOOKBACK_DAYS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{key}` has invalid value `{value}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("`{key}` must be greater than zero")]
    Zero { key: &'static str },
    #[error(transparent)]
    Chunking(#[from] ChunkError),
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub lookahead_days: u32,
    pub zone: LocalZone,
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub email_lookback_days: u32,
    /// Build and log outbound payloads without pushing them.
    pub dry_run: bool,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            zone: LocalZone::System,
            top_k: DEFAULT_TOP_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            email_lookback_days: DEFAULT_EMAIL_LOOKBACK_DAYS,
            dry_run: false,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let zone = match read(ENV_TIMEZONE) {
            Some(name) => LocalZone::parse(&name)?,
            None => defaults.zone,
        };

        let config = Self {
            lookahead_days: parse_number(ENV_LOOKAHEAD_DAYS, read(ENV_LOOKAHEAD_DAYS), defaults.lookahead_days)?,
            zone,
            top_k: parse_number(ENV_TOP_K, read(ENV_TOP_K), defaults.top_k)?,
            chunk_size: parse_number(ENV_CHUNK_SIZE, read(ENV_CHUNK_SIZE), defaults.chunk_size)?,
            chunk_overlap: parse_number(
                ENV_CHUNK_OVERLAP,
                read(ENV_CHUNK_OVERLAP),
                defaults.chunk_overlap,
            )?,
            email_lookback_days: parse_number(
                ENV_EMAIL_LOOKBACK_DAYS,
                read(ENV_EMAIL_LOOKBACK_DAYS),
                defaults.email_lookback_days,
            )?,
            dry_run: parse_bool(ENV_DRY_RUN, read(ENV_DRY_RUN), defaults.dry_run)?,
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookahead_days == 0 {
            return Err(ConfigError::Zero {
                key: ENV_LOOKAHEAD_DAYS,
            });
        }
        if self.top_k == 0 {
            return Err(ConfigError::Zero { key: ENV_TOP_K });
        }
        self.chunk_spec()?;
        Ok(())
    }

    /// Validated chunking parameters.
    pub fn chunk_spec(&self) -> Result<ChunkSpec, ConfigError> {
        Ok(ChunkSpec::new(self.chunk_size, self.chunk_overlap)?)
    }
}

fn parse_number<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key,
            value,
            reason: "expected a non-negative integer",
        }),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "expected 1|true|yes|on or 0|false|no|off",
        }),
    }
}
