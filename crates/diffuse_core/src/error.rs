//! Error taxonomy for the Crank-Nicolson engine.
//!
//! Construction errors (`InvalidGrid`, `InvalidBoundary`, `InvalidInitial`)
//! are fatal before any stepping happens. `LinearSolve` aborts a run at a
//! specific step; later snapshots are unrecoverable without that result, so
//! nothing is retried.

use thiserror::Error;

/// Result type used throughout the engine.
pub type HeatResult<T> = Result<T, HeatError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeatError {
    /// A discretization parameter failed validation at construction.
    #[error("invalid grid parameter `{parameter}`: {message}")]
    InvalidGrid {
        parameter: &'static str,
        message: String,
    },

    /// A boundary value was NaN or infinite.
    #[error("invalid {side} boundary value: {value}")]
    InvalidBoundary { side: &'static str, value: f64 },

    /// The initial interior field was malformed.
    #[error("invalid initial condition: {message}")]
    InvalidInitial { message: String },

    /// A matrix was not invertible within numerical tolerance.
    #[error("singular system: {context}")]
    SingularMatrix { context: String },

    /// The implicit solve failed while advancing a specific step.
    #[error("linear solve failed at step {step}")]
    LinearSolve {
        step: usize,
        #[source]
        source: Box<HeatError>,
    },

    /// The field buffer was requested before the run reached `Completed`.
    #[error("field buffer requested in phase `{phase}` before the run completed")]
    RunNotCompleted { phase: &'static str },
}
