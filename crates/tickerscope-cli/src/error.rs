use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Per-ticker fetch failures never reach this type; only environment
/// failures and malformed non-interactive arguments do.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerscope_core::ValidationError),

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Render(_) => 4,
            Self::Csv(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
