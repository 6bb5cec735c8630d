use crate::resolver::ResolveReasonCode;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, used in JSON output.
pub mod codes {
    pub const UNRESOLVABLE_MODULE: &str = "UNRESOLVABLE_MODULE";
    pub const INCOMPATIBLE_HOST: &str = "INCOMPATIBLE_HOST";
    pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
    pub const IO_ERROR: &str = "IO_ERROR";
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Core error type for transmod operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "could not resolve module \"{module}\" ({reason}). Are you sure the name of the module you are trying to transpile is correct?"
    )]
    UnresolvableModule {
        module: String,
        reason: ResolveReasonCode,
        tried: Vec<PathBuf>,
    },

    #[error("{message}")]
    IncompatibleHost { message: String },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn incompatible_host(msg: impl Into<String>) -> Self {
        Self::IncompatibleHost {
            message: msg.into(),
        }
    }

    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvableModule { .. } => codes::UNRESOLVABLE_MODULE,
            Self::IncompatibleHost { .. } => codes::INCOMPATIBLE_HOST,
            Self::ConfigNotFound { .. } => codes::CONFIG_NOT_FOUND,
            Self::ConfigRead { .. } => codes::CONFIG_READ_FAILED,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE_FAILED,
            Self::Io(_) => codes::IO_ERROR,
        }
    }
}
