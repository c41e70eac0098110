use thiserror::Error;

/// Simplified `Result` using [`QSvmError`](crate::QSvmError) as error type
pub type Result<T> = std::result::Result<T, QSvmError>;

/// Error variants from hyper-parameter construction or model estimation
#[derive(Error, Debug)]
pub enum QSvmError {
    #[error("the encoding base should be at least 1, but is {0}")]
    InvalidBase(usize),
    #[error("the number of encoding digits should be at least 1, but is {0}")]
    InvalidDigits(usize),
    #[error("the penalty should be positive and finite, but is {0}")]
    InvalidPenalty(f32),
    #[error("the kernel ridge should be non-negative and finite, but is {0}")]
    InvalidRidge(f32),
    #[error("the kernel coefficient should be non-negative and finite, but is {0}")]
    InvalidGamma(f32),
    /// Two collections which should agree in size do not
    #[error("expected `{expected}` entries, but `{actual}` were provided")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Every decoded multiplier sits at zero or at the penalty bound, so the
    /// bias denominator vanishes and no separating function can be recovered
    #[error("degenerate solution: all multipliers lie at 0 or at the penalty {0}, the bias is undefined")]
    DegenerateSolution(f32),
    /// Opaque failure reported by the minimization oracle
    #[error("the minimization oracle failed: {0}")]
    Oracle(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    BaseCrate(#[from] linfa::Error),
}
