//! Error types for lithops-config

use std::path::PathBuf;

/// Result type for lithops-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving a configuration document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A top-level section the run depends on is absent
    #[error("'{section}' section is mandatory but missing from the configuration")]
    MissingSection { section: String },

    /// A required key is absent after the provider merge
    #[error("'{key}' is mandatory in the '{backend}' section")]
    MissingRequiredKey { backend: String, key: String },

    /// A present key fails a semantic check
    #[error("Invalid value for '{key}' in the '{backend}' section: {message}")]
    InvalidValue {
        backend: String,
        key: String,
        message: String,
    },

    /// The pipeline was asked for a backend nobody registered
    #[error("Unknown backend: {name}")]
    UnknownBackend { name: String },

    #[error("Failed to parse {format} configuration: {message}")]
    ConfigParse { format: String, message: String },

    #[error("Failed to serialize {format} configuration: {message}")]
    ConfigSerialize { format: String, message: String },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_key(backend: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingRequiredKey {
            backend: backend.into(),
            key: key.into(),
        }
    }

    pub fn invalid(
        backend: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            backend: backend.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// The backend (or section) this error is attributed to, if any.
    pub fn backend(&self) -> Option<&str> {
        match self {
            Error::MissingSection { section } => Some(section),
            Error::MissingRequiredKey { backend, .. } | Error::InvalidValue { backend, .. } => {
                Some(backend)
            }
            Error::UnknownBackend { name } => Some(name),
            _ => None,
        }
    }

    /// Every variant means the configuration cannot be used to start the
    /// platform. Callers use this to tell configuration faults apart from
    /// control-plane faults.
    pub fn is_configuration_invalid(&self) -> bool {
        true
    }
}
