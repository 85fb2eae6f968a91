//! Error types for lithops-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] lithops_config::Error),

    #[error(transparent)]
    Controller(#[from] lithops_controller::Error),

    #[error("Cannot render output: {0}")]
    Render(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for invalid configuration, 3 for control plane
    /// failures, 1 for anything else.
    pub fn exit_code(&self) -> i32 {
        use lithops_controller::Error as Ctl;
        match self {
            CliError::Config(e) if e.is_configuration_invalid() => 2,
            CliError::Controller(Ctl::InvalidPolicy(_)) => 2,
            CliError::Controller(
                Ctl::TransportFault { .. }
                | Ctl::ControllerRejected { .. }
                | Ctl::ContextUnreadable { .. }
                | Ctl::Cancelled,
            ) => 3,
            _ => 1,
        }
    }
}
