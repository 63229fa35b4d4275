//! Restricted master problem and diving rounder for column generation.
//!
//! [`MasterProblem`] builds a set-covering relaxation or a set-partitioning
//! integer program from a [`RoutePool`](colgen_core::RoutePool), solves it
//! through a [`BackendAdapter`], and returns either shadow prices for the
//! pricing subproblem or an integral [`Solution`](colgen_core::Solution).
//! [`MasterProblem::dive`] turns a fractional relaxation into a plan by
//! fixing routes one at a time on a cloned model, bounded by a
//! limited-discrepancy budget.
//!
//! Generating routes from duals and iterating the column-generation loop
//! belong to the caller.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adapter;
mod diving;
mod error;
mod extract;
mod formulation;
mod master;

pub use adapter::BackendAdapter;
pub use diving::{DiveLimits, DiveOutcome, DiveStop, INTEGRALITY_TOLERANCE, dive};
pub use error::MasterError;
pub use extract::{extract_duals, extract_solution};
pub use formulation::{BIG_M, FormulationOptions, ModelKind, formulate};
pub use master::{MasterOutcome, MasterProblem, Relaxation};
