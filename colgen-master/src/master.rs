//! The master-problem instance driven by a column-generation loop.

use std::collections::BTreeSet;

use colgen_core::{
    DualValues, FormulationModel, Graph, MasterConfig, RoutePool, Solution, SolveOptions, VarRole,
};

use crate::adapter::BackendAdapter;
use crate::diving::{DiveLimits, DiveOutcome, INTEGRALITY_TOLERANCE, dive};
use crate::error::MasterError;
use crate::extract::{extract_duals, extract_solution};
use crate::formulation::{FormulationOptions, ModelKind, formulate};

/// Restricted master problem over a fixed graph.
///
/// The instance owns the tabu list of variable names fixed by earlier dives;
/// it grows across calls and is never shared between instances.
///
/// # Examples
/// ```
/// use colgen_core::MasterConfig;
/// use colgen_core::test_support::{pool, unit_graph};
/// use colgen_master::MasterProblem;
///
/// # fn main() -> Result<(), colgen_master::MasterError> {
/// let graph = unit_graph([1, 2, 3, 4]);
/// let routes = pool(&[
///     ("r1", &[1, 2], 10.0),
///     ("r2", &[3, 4], 12.0),
///     ("r3", &[1, 2, 3, 4], 15.0),
/// ]);
/// let config = MasterConfig { relax: false, ..MasterConfig::default() };
/// let master = MasterProblem::new(&graph, config)?;
/// let solution = master.solve_integer(&routes)?;
/// assert_eq!(solution.route_names().collect::<Vec<_>>(), vec!["r3"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MasterProblem<'g> {
    graph: &'g Graph,
    config: MasterConfig,
    formulation: FormulationOptions,
    adapter: BackendAdapter,
    tabu: BTreeSet<String>,
}

/// Result of [`MasterProblem::solve`].
#[derive(Debug, Clone, PartialEq)]
pub enum MasterOutcome<'p> {
    /// Relaxed solve, carrying duals for pricing.
    Relaxed(Relaxation<'p>),
    /// Integer solve.
    Integer(Solution),
}

impl<'g> MasterProblem<'g> {
    /// Validate `config` and select its backend.
    ///
    /// # Errors
    /// Returns [`MasterError::InvalidConfig`] for out-of-range settings and
    /// [`MasterError::BackendUnavailable`] when the backend is not compiled
    /// in.
    pub fn new(graph: &'g Graph, config: MasterConfig) -> Result<Self, MasterError> {
        config.validate()?;
        let adapter = BackendAdapter::new(config.backend)?;
        Ok(Self {
            graph,
            formulation: FormulationOptions::from(&config),
            config,
            adapter,
            tabu: BTreeSet::new(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MasterConfig {
        &self.config
    }

    /// Graph whose customers must be covered.
    #[must_use]
    pub const fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Names fixed by previous dives on this instance.
    #[must_use]
    pub const fn tabu_list(&self) -> &BTreeSet<String> {
        &self.tabu
    }

    /// Build the model this instance would solve for `pool`.
    #[must_use]
    pub fn formulate(&self, pool: &RoutePool, kind: ModelKind) -> FormulationModel {
        formulate(pool, self.graph, &self.formulation, kind)
    }

    /// Solve in the mode selected by [`MasterConfig::relax`].
    ///
    /// # Errors
    /// See [`MasterProblem::solve_relaxed`] and
    /// [`MasterProblem::solve_integer`].
    pub fn solve<'p>(&self, pool: &'p RoutePool) -> Result<MasterOutcome<'p>, MasterError> {
        if self.config.relax {
            self.solve_relaxed(pool).map(MasterOutcome::Relaxed)
        } else {
            self.solve_integer(pool).map(MasterOutcome::Integer)
        }
    }

    /// Solve the covering relaxation and read its shadow prices.
    ///
    /// # Errors
    /// Returns [`MasterError::OptimizationFailure`] when the backend does not
    /// reach optimality and [`MasterError::MissingDuals`] when it returns no
    /// prices.
    pub fn solve_relaxed<'p>(&self, pool: &'p RoutePool) -> Result<Relaxation<'p>, MasterError> {
        let model = self.formulate(pool, ModelKind::Relaxed);
        let solved = self
            .adapter
            .solve_optimal(&model, &self.options().with_duals(true))?;
        let (duals, objective) = extract_duals(&model, &solved)?;
        let relaxation = Relaxation {
            pool,
            model,
            values: solved.values,
            duals,
            objective,
        };
        let artificial = relaxation.artificial_activity();
        if artificial > INTEGRALITY_TOLERANCE {
            log::warn!(
                "relaxed master uses {artificial} units of artificial slack; the pool cannot serve the instance yet"
            );
        }
        log::debug!(
            "relaxed master over {} routes: objective {objective}",
            pool.len()
        );
        Ok(relaxation)
    }

    /// Solve the partitioning program.
    ///
    /// # Errors
    /// Returns [`MasterError::OptimizationFailure`] when the backend does not
    /// reach optimality.
    pub fn solve_integer(&self, pool: &RoutePool) -> Result<Solution, MasterError> {
        let model = self.formulate(pool, ModelKind::Integer);
        let solved = self
            .adapter
            .solve_optimal(&model, &self.options().with_duals(false))?;
        let solution = extract_solution(&model, &solved.values, pool);
        log::debug!(
            "integer master selected {} routes at cost {}",
            solution.routes.len(),
            solution.total_cost
        );
        Ok(solution)
    }

    /// Dive from `relaxation` and add the fixed names to the tabu list.
    ///
    /// Never fails: a failed re-solve ends the dive early and is reported
    /// through [`DiveOutcome::stopped`].
    pub fn dive(&mut self, relaxation: &Relaxation<'_>) -> DiveOutcome {
        let outcome = dive(
            &self.adapter,
            &relaxation.model,
            &relaxation.values,
            relaxation.pool,
            &self.tabu,
            DiveLimits::from(&self.config),
            &self.options(),
        );
        log::info!(
            "dive stopped {:?} after fixing {:?}",
            outcome.stopped,
            outcome.fixed
        );
        self.tabu.extend(outcome.fixed.iter().cloned());
        outcome
    }

    fn options(&self) -> SolveOptions {
        self.config.solve_options()
    }
}

/// Optimal solution of a covering relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation<'p> {
    pool: &'p RoutePool,
    model: FormulationModel,
    values: Vec<f64>,
    duals: DualValues,
    objective: f64,
}

impl<'p> Relaxation<'p> {
    /// Route pool the relaxation was built from.
    #[must_use]
    pub const fn pool(&self) -> &'p RoutePool {
        self.pool
    }

    /// Solved model.
    #[must_use]
    pub const fn model(&self) -> &FormulationModel {
        &self.model
    }

    /// Variable values indexed like the model's variables.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the variable named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.model
            .find(name)
            .and_then(|id| self.values.get(id.index()).copied())
    }

    /// Shadow prices for pricing.
    #[must_use]
    pub const fn duals(&self) -> &DualValues {
        &self.duals
    }

    /// Optimal objective, artificial penalties included.
    #[must_use]
    pub const fn objective(&self) -> f64 {
        self.objective
    }

    /// Slack used on the fleet bound of `vehicle_type`.
    #[must_use]
    pub fn vehicle_slack(&self, vehicle_type: usize) -> f64 {
        self.sum_where(|role| role == VarRole::VehicleSlack(vehicle_type))
    }

    /// Total value of all artificial variables.
    #[must_use]
    pub fn artificial_activity(&self) -> f64 {
        self.sum_where(VarRole::is_artificial)
    }

    /// Whether every route and drop variable is integral.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "integrality gap is a float difference")]
    pub fn is_integral(&self) -> bool {
        self.model
            .variables()
            .filter(|(_, var)| matches!(var.role, VarRole::Route(_) | VarRole::Drop(_)))
            .filter_map(|(id, _)| self.values.get(id.index()))
            .all(|value| (value - value.round()).abs() <= INTEGRALITY_TOLERANCE)
    }

    fn sum_where(&self, keep: impl Fn(VarRole) -> bool) -> f64 {
        self.model
            .variables()
            .filter(|(_, var)| keep(var.role))
            .filter_map(|(id, _)| self.values.get(id.index()))
            .sum()
    }
}
