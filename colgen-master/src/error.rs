//! Error types raised by master-problem solves.

use colgen_core::{Backend, ConfigError, SolveStatus};
use thiserror::Error;

/// Errors returned by [`MasterProblem`](crate::MasterProblem) operations.
///
/// Diving never raises: a failed re-solve ends the dive instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MasterError {
    /// The backend did not report an optimal solution.
    #[error("optimization failed: {status}")]
    OptimizationFailure {
        /// Status reported by the backend.
        status: SolveStatus,
    },
    /// The configured backend was not compiled in.
    #[error("backend {backend} requires the `{feature}` feature to be enabled")]
    BackendUnavailable {
        /// Requested backend.
        backend: Backend,
        /// Cargo feature providing it.
        feature: &'static str,
    },
    /// The configuration failed validation.
    #[error("invalid master configuration")]
    InvalidConfig(#[from] ConfigError),
    /// A relaxed solve came back without shadow prices.
    #[error("backend returned no shadow prices for a relaxed solve")]
    MissingDuals,
}
