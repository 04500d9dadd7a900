use thiserror::Error;

/// Why a single inventory stage could not produce its normal output.
///
/// Every variant is handled the same way by the aggregator: the stage stops,
/// one placeholder line carrying this error's message is appended, and the
/// next stage runs regardless.
#[derive(Debug, Error)]
pub enum StageError {
    /// The platform service backing the stage is missing or unreachable.
    #[error("{0}")]
    Unavailable(String),

    /// A helper tool ran but reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Anything else, including a panic raised inside a source.
    #[error("{0}")]
    Unexpected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Hid(#[from] hidapi::HidError),
}

impl StageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StageError::Unavailable(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        StageError::Unexpected(message.into())
    }
}
