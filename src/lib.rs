//! Facade crate for the column-generation master-problem engine.
//!
//! This crate re-exports the core domain types, the master problem with its
//! diving rounder, and the LP/MIP backends. The `microlp` backend is always
//! present; HiGHS is available behind the `solver-highs` feature.

#![forbid(unsafe_code)]

pub use colgen_core::{
    Backend, BackendParseError, BackendSolution, ConfigError, DualKey, DualValues,
    FormulationModel, Graph, LpBackend, MasterConfig, Node, NodeError, NodeId, PoolError, Route,
    RouteError, RoutePool, Solution, SolveOptions, SolveStatus,
};
pub use colgen_master::{
    BackendAdapter, DiveOutcome, DiveStop, MasterError, MasterOutcome, MasterProblem, ModelKind,
    Relaxation,
};
pub use colgen_solver_microlp::MicrolpBackend;

#[cfg(feature = "solver-highs")]
pub use colgen_solver_highs::HighsBackend;
