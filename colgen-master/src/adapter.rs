//! Solver Backend Adapter.
//!
//! The set of engines is closed, so dispatch is a plain enum over the
//! backends compiled into this build.

use colgen_core::{Backend, BackendSolution, FormulationModel, LpBackend, SolveOptions};
#[cfg(feature = "solver-highs")]
use colgen_solver_highs::HighsBackend;
use colgen_solver_microlp::MicrolpBackend;

use crate::error::MasterError;

/// Engine selected by [`MasterConfig::backend`](colgen_core::MasterConfig).
#[derive(Debug, Clone, Copy)]
pub enum BackendAdapter {
    /// `microlp` engine.
    Microlp(MicrolpBackend),
    /// HiGHS engine.
    #[cfg(feature = "solver-highs")]
    Highs(HighsBackend),
}

impl BackendAdapter {
    /// Instantiate the engine named by `backend`.
    ///
    /// # Errors
    /// Returns [`MasterError::BackendUnavailable`] when the engine was not
    /// compiled in.
    ///
    /// # Examples
    /// ```
    /// use colgen_core::Backend;
    /// use colgen_master::BackendAdapter;
    ///
    /// let adapter = BackendAdapter::new(Backend::Microlp).expect("always available");
    /// assert_eq!(adapter.backend(), Backend::Microlp);
    /// ```
    pub fn new(backend: Backend) -> Result<Self, MasterError> {
        match backend {
            Backend::Microlp => Ok(Self::Microlp(MicrolpBackend::new())),
            #[cfg(feature = "solver-highs")]
            Backend::Highs => Ok(Self::Highs(HighsBackend::new())),
            #[cfg(not(feature = "solver-highs"))]
            Backend::Highs => Err(MasterError::BackendUnavailable {
                backend,
                feature: "solver-highs",
            }),
        }
    }

    /// Identifier of the wrapped engine.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Microlp(_) => Backend::Microlp,
            #[cfg(feature = "solver-highs")]
            Self::Highs(_) => Backend::Highs,
        }
    }

    /// Solve and require optimality.
    ///
    /// # Errors
    /// Returns [`MasterError::OptimizationFailure`] carrying the backend
    /// status for any non-optimal outcome.
    pub fn solve_optimal(
        &self,
        model: &FormulationModel,
        options: &SolveOptions,
    ) -> Result<BackendSolution, MasterError> {
        let solution = LpBackend::solve(self, model, options);
        if solution.status.is_optimal() {
            Ok(solution)
        } else {
            log::debug!("{} returned {}", self.backend(), solution.status);
            Err(MasterError::OptimizationFailure {
                status: solution.status,
            })
        }
    }
}

impl LpBackend for BackendAdapter {
    fn solve(&self, model: &FormulationModel, options: &SolveOptions) -> BackendSolution {
        match self {
            Self::Microlp(engine) => engine.solve(model, options),
            #[cfg(feature = "solver-highs")]
            Self::Highs(engine) => engine.solve(model, options),
        }
    }
}
