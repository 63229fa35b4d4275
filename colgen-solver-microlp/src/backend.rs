//! `MicrolpBackend` implementation backed by `microlp`.

use std::time::Instant;

use colgen_core::{
    BackendSolution, FormulationModel, LpBackend, SolveOptions, SolveStatus, VarKind,
};
use microlp::{LinearExpr, OptimizationDirection, Problem, Variable};

use crate::duals::shadow_prices;

/// Feasibility tolerance for rows evaluated without the engine.
const ROW_TOLERANCE: f64 = 1e-9;

/// Default backend solving master problems with `microlp`.
///
/// The engine has no time-limit option, so a configured limit is only
/// checked after the fact and reported through the log.
///
/// # Examples
/// ```
/// use colgen_core::{
///     FormulationModel, LpBackend, RowRole, Sense, SolveOptions, VarKind, VarRole,
/// };
/// use colgen_solver_microlp::MicrolpBackend;
///
/// let mut model = FormulationModel::new();
/// let y = model.add_variable("r1", VarRole::Route(0), VarKind::Continuous, 1.0, 3.0);
/// model.add_constraint("visit_1", RowRole::Cover(1), vec![(y, 1.0)], Sense::Ge, 1.0);
///
/// let solution = MicrolpBackend::new().solve(&model, &SolveOptions::default());
/// assert!(solution.status.is_optimal());
/// assert!((solution.objective - 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpBackend;

impl MicrolpBackend {
    /// Construct the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LpBackend for MicrolpBackend {
    fn solve(&self, model: &FormulationModel, options: &SolveOptions) -> BackendSolution {
        let started_at = Instant::now();
        let Some((problem, vars)) = translate(model) else {
            log::debug!("microlp: a row without terms cannot be satisfied");
            return BackendSolution::failed(SolveStatus::Infeasible);
        };
        let solution = if vars.is_empty() {
            BackendSolution {
                status: SolveStatus::Optimal,
                objective: 0.0,
                values: Vec::new(),
                row_duals: None,
            }
        } else {
            match problem.solve() {
                Ok(found) => BackendSolution {
                    status: SolveStatus::Optimal,
                    objective: found.objective(),
                    values: vars.iter().map(|var| found[*var]).collect(),
                    row_duals: None,
                },
                Err(err) => BackendSolution::failed(status_of(err)),
            }
        };
        if let Some(limit) = options.time_limit
            && started_at.elapsed() > limit
        {
            log::warn!(
                "microlp ignores time limits; solve took {:?} against a budget of {limit:?}",
                started_at.elapsed()
            );
        }
        log::debug!(
            "microlp: {} variables, {} rows -> {}",
            model.num_variables(),
            model.num_constraints(),
            solution.status
        );
        if options.duals && solution.status.is_optimal() && !model.has_integer_variables() {
            return attach_duals(model, solution);
        }
        solution
    }
}

fn attach_duals(model: &FormulationModel, solution: BackendSolution) -> BackendSolution {
    match shadow_prices(model) {
        Ok(prices) => BackendSolution {
            row_duals: Some(prices),
            ..solution
        },
        Err(err) => {
            log::warn!("microlp: dual program failed: {err}");
            BackendSolution::failed(SolveStatus::Error(format!(
                "shadow prices unavailable: {err}"
            )))
        }
    }
}

fn status_of(err: microlp::Error) -> SolveStatus {
    match err {
        microlp::Error::Infeasible => SolveStatus::Infeasible,
        microlp::Error::Unbounded => SolveStatus::Unbounded,
        other => SolveStatus::Error(other.to_string()),
    }
}

/// Build the `microlp` problem, or `None` when a row without terms is
/// violated at zero.
fn translate(model: &FormulationModel) -> Option<(Problem, Vec<Variable>)> {
    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let vars: Vec<Variable> = model
        .variables()
        .map(|(_, var)| match var.kind {
            VarKind::Binary => problem.add_binary_var(var.cost),
            VarKind::Continuous => problem.add_var(var.cost, (var.lower, var.upper)),
        })
        .collect();

    for (_, row) in model.constraints() {
        if row.terms.is_empty() {
            if row.sense.holds(0.0, row.rhs, ROW_TOLERANCE) {
                continue;
            }
            return None;
        }
        let expr: LinearExpr = row
            .terms
            .iter()
            .filter_map(|(id, coeff)| vars.get(id.index()).map(|var| (*var, *coeff)))
            .collect();
        problem.add_constraint(expr, comparison(row.sense), row.rhs);
    }
    Some((problem, vars))
}

const fn comparison(sense: colgen_core::Sense) -> microlp::ComparisonOp {
    match sense {
        colgen_core::Sense::Ge => microlp::ComparisonOp::Ge,
        colgen_core::Sense::Eq => microlp::ComparisonOp::Eq,
        colgen_core::Sense::Le => microlp::ComparisonOp::Le,
    }
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "tests compare floats with a tolerance")]
mod tests {
    use super::*;
    use colgen_core::{RowRole, Sense, VarRole};
    use rstest::{fixture, rstest};

    #[fixture]
    fn backend() -> MicrolpBackend {
        MicrolpBackend::new()
    }

    fn options(duals: bool) -> SolveOptions {
        SolveOptions::default().with_duals(duals)
    }

    #[rstest]
    fn binary_partition_picks_cheapest_cover(backend: MicrolpBackend) {
        let mut model = FormulationModel::new();
        let a = model.add_variable("a", VarRole::Route(0), VarKind::Binary, 1.0, 10.0);
        let b = model.add_variable("b", VarRole::Route(1), VarKind::Binary, 1.0, 12.0);
        let c = model.add_variable("c", VarRole::Route(2), VarKind::Binary, 1.0, 15.0);
        for (node, first) in [(1, a), (2, a), (3, b), (4, b)] {
            model.add_constraint(
                format!("visit_{node}"),
                RowRole::Cover(node),
                vec![(first, 1.0), (c, 1.0)],
                Sense::Eq,
                1.0,
            );
        }
        let solution = backend.solve(&model, &options(true));
        assert!(solution.status.is_optimal());
        assert!((solution.objective - 15.0).abs() < 1e-6);
        assert!(solution.values[c.index()] > 0.5);
        assert!(solution.row_duals.is_none());
    }

    #[rstest]
    fn continuous_solve_reports_duals(backend: MicrolpBackend) {
        let mut model = FormulationModel::new();
        let y = model.add_variable("y", VarRole::Route(0), VarKind::Continuous, 1.0, 6.0);
        model.add_constraint("visit_1", RowRole::Cover(1), vec![(y, 1.0)], Sense::Ge, 1.0);
        let solution = backend.solve(&model, &options(true));
        let duals = solution.row_duals.expect("duals requested");
        assert!((duals[0] - 6.0).abs() < 1e-6);
    }

    #[rstest]
    fn duals_are_skipped_unless_requested(backend: MicrolpBackend) {
        let mut model = FormulationModel::new();
        let y = model.add_variable("y", VarRole::Route(0), VarKind::Continuous, 1.0, 6.0);
        model.add_constraint("visit_1", RowRole::Cover(1), vec![(y, 1.0)], Sense::Ge, 1.0);
        let solution = backend.solve(&model, &options(false));
        assert!(solution.status.is_optimal());
        assert!(solution.row_duals.is_none());
    }

    #[rstest]
    fn uncovered_row_is_infeasible(backend: MicrolpBackend) {
        let mut model = FormulationModel::new();
        model.add_variable("y", VarRole::Route(0), VarKind::Continuous, 1.0, 1.0);
        model.add_constraint("visit_9", RowRole::Cover(9), Vec::new(), Sense::Ge, 1.0);
        let solution = backend.solve(&model, &options(true));
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[rstest]
    fn conflicting_rows_are_infeasible(backend: MicrolpBackend) {
        let mut model = FormulationModel::new();
        let y = model.add_variable("y", VarRole::Route(0), VarKind::Continuous, 1.0, 1.0);
        model.add_constraint("visit_1", RowRole::Cover(1), vec![(y, 1.0)], Sense::Ge, 1.0);
        model.add_constraint(
            "vehicles_0",
            RowRole::VehicleBound(0),
            vec![(y, 1.0)],
            Sense::Le,
            0.0,
        );
        let solution = backend.solve(&model, &options(false));
        assert_eq!(solution.status, SolveStatus::Infeasible);
    }
}
