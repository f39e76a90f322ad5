//! Configuration loading.
//!
//! Environment variables override the built-in defaults:
//!
//! - `PROVREG_MAX_PRODUCTS`: capacity of the registry
//! - `PROVREG_CREATION_FEE`: fee charged per created product

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use provreg_products::RegistryConfig;

pub const MAX_PRODUCTS_VAR: &str = "PROVREG_MAX_PRODUCTS";
pub const CREATION_FEE_VAR: &str = "PROVREG_CREATION_FEE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<RegistryConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<RegistryConfig, ConfigError> {
    let mut config = RegistryConfig::default();

    if let Some(max_products) = parse_var(&lookup, MAX_PRODUCTS_VAR)? {
        config = config.with_max_products(max_products);
    }
    if let Some(fee) = parse_var(&lookup, CREATION_FEE_VAR)? {
        config = config.with_creation_fee(fee);
    }

    Ok(config)
}

/// Load configuration from a JSON file. Missing fields take their defaults.
pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<RegistryConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading registry config {}", path.display()))?;
    RegistryConfig::from_json_str(&raw)
        .with_context(|| format!("parsing registry config {}", path.display()))
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        })
}
