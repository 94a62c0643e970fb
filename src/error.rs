use thiserror::Error;

/// Errors raised by the tempo pipeline itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TempoError {
    /// Empty sample buffer or zero sample rate.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A parameter that breaks the caller contract (zero factor, empty range, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised by an [`AnalysisSession`](crate::session::AnalysisSession).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("an analysis is already running")]
    Busy,
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error(transparent)]
    Analysis(#[from] TempoError),
}
