//! Boundary between the master problem and LP/MIP engines.
//!
//! A backend receives a [`FormulationModel`] and returns a
//! [`BackendSolution`]: a status plus engine-independent values. Backends
//! never raise on a non-optimal outcome; deciding whether that is fatal
//! belongs to the caller.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::model::FormulationModel;

/// Termination status reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// An optimal solution was found.
    Optimal,
    /// The constraints cannot be satisfied.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
    /// The time limit expired before optimality was proven.
    TimeLimitReached,
    /// The engine failed for another reason.
    Error(String),
}

impl SolveStatus {
    /// Whether the status is [`SolveStatus::Optimal`].
    #[must_use]
    pub const fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => f.write_str("optimal"),
            Self::Infeasible => f.write_str("infeasible"),
            Self::Unbounded => f.write_str("unbounded"),
            Self::TimeLimitReached => f.write_str("time limit reached"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Generic hints translated into engine options by each backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Soft wall-clock budget; backends may ignore it.
    pub time_limit: Option<Duration>,
    /// Whether row shadow prices are wanted. Ignored for integer models.
    pub duals: bool,
}

impl SolveOptions {
    /// Same options with shadow prices requested or not.
    #[must_use]
    pub const fn with_duals(mut self, duals: bool) -> Self {
        self.duals = duals;
        self
    }
}

/// Engine-independent view of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSolution {
    /// Termination status.
    pub status: SolveStatus,
    /// Objective value; meaningful only when optimal.
    pub objective: f64,
    /// Variable values indexed by [`VarId::index`](crate::VarId::index);
    /// empty unless optimal.
    pub values: Vec<f64>,
    /// Constraint shadow prices indexed by
    /// [`RowId::index`](crate::RowId::index); present only for optimal
    /// solves of continuous models with
    /// [`SolveOptions::duals`] set.
    pub row_duals: Option<Vec<f64>>,
}

impl BackendSolution {
    /// A non-optimal outcome carrying no values.
    #[must_use]
    pub const fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            objective: f64::NAN,
            values: Vec::new(),
            row_duals: None,
        }
    }
}

/// An LP/MIP engine able to solve a [`FormulationModel`].
///
/// Implementations must not mutate shared state between calls; the same
/// backend solves the original model and every diving copy.
pub trait LpBackend {
    /// Solve `model`, returning the status and values.
    fn solve(&self, model: &FormulationModel, options: &SolveOptions) -> BackendSolution;
}

/// Identifier of a supported backend.
///
/// # Examples
/// ```
/// use colgen_core::Backend;
///
/// let backend: Backend = "highs".parse().expect("known backend");
/// assert_eq!(backend, Backend::Highs);
/// assert!("cplex".parse::<Backend>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Backend {
    /// Pure-Rust simplex and branch-and-bound from the `microlp` crate.
    #[default]
    Microlp,
    /// Native HiGHS through the `highs` crate.
    Highs,
}

impl Backend {
    /// Every supported backend.
    pub const ALL: [Self; 2] = [Self::Microlp, Self::Highs];

    /// Configuration identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Microlp => "microlp",
            Self::Highs => "highs",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown backend identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend {0:?}; expected one of: microlp, highs")]
pub struct BackendParseError(pub String);

impl FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|backend| backend.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BackendParseError(s.to_owned()))
    }
}

impl TryFrom<String> for Backend {
    type Error = BackendParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Backend> for String {
    fn from(value: Backend) -> Self {
        value.as_str().to_owned()
    }
}
