//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::{HttpConfig, RouterConfig};
use crate::config::validation::{validate_http_config, validate_router_config, ValidationError};

/// Error type for configuration loading. Always fatal at start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate the stream router's configuration.
pub fn load_router_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = read_json(path)?;
    validate_router_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate the HTTP bridge's configuration.
pub fn load_http_config(path: &Path) -> Result<HttpConfig, ConfigError> {
    let config: HttpConfig = read_json(path)?;
    validate_http_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
