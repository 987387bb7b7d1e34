use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed report: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid JSON report file")]
    InvalidFormat,

    #[error(
        "Report file {0} not found. Make sure Playwright is configured to generate a JSON report."
    )]
    ReportNotFound(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
