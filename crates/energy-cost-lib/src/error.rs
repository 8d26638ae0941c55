use thiserror::Error;

/// Arithmetic faults of a cost estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("no readings to average over")]
    EmptyReadingSet,

    #[error("readings span zero elapsed time")]
    ZeroElapsedTime,

    #[error("cost does not fit in a decimal")]
    Overflow,
}

pub type EstimateResult<T> = std::result::Result<T, EstimateError>;
