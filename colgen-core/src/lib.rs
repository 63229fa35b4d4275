//! Core domain types for the column-generation master problem.
//!
//! The graph, candidate routes, the backend-independent formulation model
//! and the [`LpBackend`] boundary live here so solver crates and the master
//! problem can share them without depending on each other. Constructors
//! return `Result` to surface invalid input early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod config;
mod graph;
mod model;
mod route;
mod solution;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use backend::{
    Backend, BackendParseError, BackendSolution, LpBackend, SolveOptions, SolveStatus,
};
pub use config::{ConfigError, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DISCREPANCY, MasterConfig};
pub use graph::{Graph, Node, NodeError, NodeId};
pub use model::{
    Constraint, FormulationModel, GENERATED_PREFIX, RowId, RowRole, Sense, VarId, VarKind, VarRole,
    Variable,
};
pub use route::{PoolError, Route, RouteError, RoutePool};
pub use solution::{DualKey, DualValues, Solution};
