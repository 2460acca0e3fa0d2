use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("recognition controller has been disposed")]
    Disposed,
    #[error("failed to spawn recognition worker")]
    Spawn(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
