//! Pure-Rust LP/MIP backend for the column-generation master problem.
//!
//! [`MicrolpBackend`] translates a [`FormulationModel`](colgen_core::FormulationModel)
//! into a `microlp` problem, solves it with the crate's simplex and
//! branch-and-bound, and reports values through the engine-independent
//! [`BackendSolution`](colgen_core::BackendSolution).
//!
//! `microlp` does not expose row duals, so shadow prices of continuous
//! models are recovered by solving the explicit dual program.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod duals;

pub use backend::MicrolpBackend;
