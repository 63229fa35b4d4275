//! Diving Rounder.
//!
//! A dive repeatedly fixes the route variable closest to integrality to 1
//! on a private copy of the relaxed model and re-solves it. The number of
//! fixings is capped by a limited-discrepancy budget and a depth limit. A
//! failed re-solve ends the dive and keeps the last accepted state.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use colgen_core::{
    FormulationModel, LpBackend, MasterConfig, RoutePool, RowRole, Sense, Solution, SolveOptions,
    VarId, VarRole,
};

use crate::extract::extract_solution;

/// Distance from the nearest integer below which a value counts as integral.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Budgets bounding a dive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiveLimits {
    /// Maximum number of accepted re-solves.
    pub max_depth: usize,
    /// Maximum number of fixings.
    pub max_discrepancy: usize,
}

impl From<&MasterConfig> for DiveLimits {
    fn from(config: &MasterConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_discrepancy: config.max_discrepancy,
        }
    }
}

/// Why a dive stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiveStop {
    /// No eligible fractional variable remained or a budget ran out.
    Exhausted,
    /// A re-solve after fixing did not return an optimal solution.
    Infeasible,
}

/// Result of a dive.
#[derive(Debug, Clone, PartialEq)]
pub struct DiveOutcome {
    /// Plan read from the last accepted solve; may still be fractional.
    pub solution: Solution,
    /// Set when the dive fixed nothing, telling the caller not to dive again.
    pub stop_diving: bool,
    /// Terminal state.
    pub stopped: DiveStop,
    /// Names fixed to 1 during this dive, in fixing order.
    pub fixed: Vec<String>,
    /// Number of accepted re-solves.
    pub depth: usize,
}

/// Dive from a solved relaxation.
///
/// `values` are the optimal values of `model`, which is cloned and never
/// modified. Variables named in `tabu` are never fixed.
///
/// Among fractional route variables the one nearest to an integer is fixed
/// first; ties go to the lexicographically smallest name.
pub fn dive<B>(
    backend: &B,
    model: &FormulationModel,
    values: &[f64],
    pool: &RoutePool,
    tabu: &BTreeSet<String>,
    limits: DiveLimits,
    options: &SolveOptions,
) -> DiveOutcome
where
    B: LpBackend + ?Sized,
{
    let resolve = options.with_duals(false);
    let mut current = model.clone();
    let mut current_values = values.to_vec();
    let mut fixed: Vec<String> = Vec::new();
    let mut depth = 0;

    let stopped = loop {
        if depth > limits.max_depth || fixed.len() >= limits.max_discrepancy {
            break DiveStop::Exhausted;
        }
        let Some(candidate) = pick_candidate(&current, &current_values, tabu, &fixed) else {
            break DiveStop::Exhausted;
        };
        let name = current
            .variable(candidate)
            .map(|var| var.name.clone())
            .unwrap_or_default();
        let mut trial = current.clone();
        trial.add_constraint(
            format!("fix_{name}"),
            RowRole::Fixing(candidate),
            vec![(candidate, 1.0)],
            Sense::Eq,
            1.0,
        );
        let resolved = backend.solve(&trial, &resolve);
        if !resolved.status.is_optimal() {
            log::debug!("dive: fixing {name} left the master {}", resolved.status);
            break DiveStop::Infeasible;
        }
        log::debug!(
            "dive: fixed {name} at depth {depth}, objective {}",
            resolved.objective
        );
        current = trial;
        current_values = resolved.values;
        fixed.push(name);
        depth += 1;
    };

    DiveOutcome {
        solution: extract_solution(&current, &current_values, pool),
        stop_diving: fixed.is_empty(),
        stopped,
        fixed,
        depth,
    }
}

#[expect(clippy::float_arithmetic, reason = "integrality gap is a float difference")]
fn pick_candidate(
    model: &FormulationModel,
    values: &[f64],
    tabu: &BTreeSet<String>,
    fixed: &[String],
) -> Option<VarId> {
    model
        .variables()
        .filter(|(_, var)| matches!(var.role, VarRole::Route(_)))
        .filter(|(_, var)| !tabu.contains(&var.name) && !fixed.contains(&var.name))
        .filter_map(|(id, var)| {
            let value = values.get(id.index()).copied()?;
            let gap = (value - value.round()).abs();
            (gap > INTEGRALITY_TOLERANCE).then_some((id, var.name.as_str(), gap))
        })
        .min_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        })
        .map(|(id, _, _)| id)
}
