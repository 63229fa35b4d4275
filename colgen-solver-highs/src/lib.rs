//! Optional HiGHS backend for the column-generation master problem.
//!
//! Compiled only behind the `solver-highs` feature of the facade crate as it
//! builds the native HiGHS library. Unlike `microlp`, HiGHS honours the time
//! limit and reports row duals directly.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use colgen_core::{
    BackendSolution, FormulationModel, LpBackend, Sense, SolveOptions, SolveStatus, VarKind,
};
use highs::{Col, HighsModelStatus, RowProblem};

/// Backend solving master problems with HiGHS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsBackend;

impl HighsBackend {
    /// Construct the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LpBackend for HighsBackend {
    fn solve(&self, model: &FormulationModel, options: &SolveOptions) -> BackendSolution {
        let (problem, cols) = translate(model);
        let mut engine = problem.optimise(highs::Sense::Minimise);
        engine.set_option("output_flag", false);
        if let Some(limit) = options.time_limit {
            engine.set_option("time_limit", limit.as_secs_f64());
        }
        let solved = match engine.try_solve() {
            Ok(solved) => solved,
            Err(status) => {
                return BackendSolution::failed(SolveStatus::Error(format!("{status:?}")));
            }
        };
        let status = status_of(solved.status());
        log::debug!(
            "highs: {} variables, {} rows -> {status}",
            model.num_variables(),
            model.num_constraints()
        );
        if !status.is_optimal() {
            return BackendSolution::failed(status);
        }
        let raw = solved.get_solution();
        let values: Vec<f64> = raw.columns().iter().take(cols.len()).copied().collect();
        let row_duals = (options.duals && !model.has_integer_variables())
            .then(|| raw.dual_rows().to_vec());
        BackendSolution {
            status,
            objective: model.objective_value(&values),
            values,
            row_duals,
        }
    }
}

fn status_of(status: HighsModelStatus) -> SolveStatus {
    match status {
        HighsModelStatus::Optimal => SolveStatus::Optimal,
        HighsModelStatus::Infeasible => SolveStatus::Infeasible,
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
            SolveStatus::Unbounded
        }
        HighsModelStatus::ReachedTimeLimit => SolveStatus::TimeLimitReached,
        other => SolveStatus::Error(format!("{other:?}")),
    }
}

fn translate(model: &FormulationModel) -> (RowProblem, Vec<Col>) {
    let mut problem = RowProblem::default();
    let cols: Vec<Col> = model
        .variables()
        .map(|(_, var)| match var.kind {
            VarKind::Binary => problem.add_integer_column(var.cost, 0..=1),
            VarKind::Continuous if var.upper.is_finite() => {
                problem.add_column(var.cost, var.lower..=var.upper)
            }
            VarKind::Continuous => problem.add_column(var.cost, var.lower..),
        })
        .collect();

    for (_, row) in model.constraints() {
        let factors: Vec<(Col, f64)> = row
            .terms
            .iter()
            .filter_map(|(id, coeff)| cols.get(id.index()).map(|col| (*col, *coeff)))
            .collect();
        match row.sense {
            Sense::Ge => {
                problem.add_row(row.rhs.., &factors);
            }
            Sense::Eq => {
                problem.add_row(row.rhs..=row.rhs, &factors);
            }
            Sense::Le => {
                problem.add_row(..=row.rhs, &factors);
            }
        }
    }
    (problem, cols)
}
