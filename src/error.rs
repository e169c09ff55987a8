use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error("Unable to find environment variable for $GITHUB_STEP_SUMMARY")]
    MissingSummaryPath,
}

pub type Result<T> = std::result::Result<T, SummaryError>;
