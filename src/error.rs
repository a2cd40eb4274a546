#[derive(Debug, thiserror::Error)]
pub enum ScorecardError {
    #[error("data error: {0}")]
    Data(String),

    #[error("insufficient rows: requested a sample of {requested} but only {available} valid rows are available")]
    InsufficientRows { requested: usize, available: usize },

    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ScorecardError>;
