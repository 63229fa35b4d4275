//! Dual and Solution Extractors.

use colgen_core::{
    BackendSolution, DualKey, DualValues, FormulationModel, RoutePool, RowRole, Solution, VarRole,
};

use crate::error::MasterError;

/// Values above this count as selected in an integral solution.
const SELECTED: f64 = 0.5;

/// Shadow prices keyed by customer and vehicle type, plus the objective.
///
/// Fixing rows carry no price of interest and are skipped.
///
/// # Errors
/// Returns [`MasterError::MissingDuals`] when the backend reported no
/// prices, or fewer prices than the model has rows.
pub fn extract_duals(
    model: &FormulationModel,
    solution: &BackendSolution,
) -> Result<(DualValues, f64), MasterError> {
    let prices = solution
        .row_duals
        .as_deref()
        .filter(|prices| prices.len() >= model.num_constraints())
        .ok_or(MasterError::MissingDuals)?;
    let duals = model
        .constraints()
        .filter_map(|(id, row)| {
            let key = match row.role {
                RowRole::Cover(customer) => DualKey::Node(customer),
                RowRole::VehicleBound(vehicle_type) => DualKey::Vehicle(vehicle_type),
                RowRole::Fixing(_) => return None,
            };
            prices.get(id.index()).map(|price| (key, *price))
        })
        .collect();
    Ok((duals, solution.objective))
}

/// Integral plan read from variable `values`.
///
/// Routes and drop variables above one half are selected; `total_cost` adds
/// the selected route costs to the penalties of dropped customers.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "total cost sums route costs and penalties")]
pub fn extract_solution(model: &FormulationModel, values: &[f64], pool: &RoutePool) -> Solution {
    let mut solution = Solution::default();
    let mut total = 0.0;
    for (id, var) in model.variables() {
        if values.get(id.index()).copied().unwrap_or(0.0) <= SELECTED {
            continue;
        }
        match var.role {
            VarRole::Route(idx) => {
                if let Some(route) = pool.get(idx) {
                    total += route.cost();
                    solution.routes.push(route.clone());
                }
            }
            VarRole::Drop(customer) => {
                total += var.cost;
                solution.dropped_nodes.push(customer);
            }
            VarRole::PeriodicSlack(_) | VarRole::VehicleSlack(_) => {}
        }
    }
    solution.dropped_nodes.sort_unstable();
    solution.total_cost = if total.is_finite() {
        total
    } else {
        log::warn!("selected routes have a non-finite total cost; reporting 0");
        0.0
    };
    solution
}
