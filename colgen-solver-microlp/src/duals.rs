//! Shadow prices through the explicit dual program.
//!
//! For `min cᵀx` subject to rows `aᵢx (≥|=|≤) bᵢ` and `0 ≤ x ≤ u`, the dual
//! is `max bᵀπ − uᵀμ` subject to `aⱼᵀπ − μⱼ ≤ cⱼ`, with `πᵢ ≥ 0` on `≥` rows,
//! `πᵢ ≤ 0` on `≤` rows, `πᵢ` free on `=` rows and `μ ≥ 0`. Its optimal `π`
//! is a vector of shadow prices of the primal rows.

use colgen_core::{FormulationModel, Sense};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

/// Widening applied to finite upper bounds in the dual objective.
///
/// Among dual optima it breaks ties towards zero bound multipliers, so a
/// bound that is met but not needed does not absorb part of a row price.
const BOUND_SLACK: f64 = 1e-6;

/// Shadow price of every row of `model`, indexed by `RowId::index`.
///
/// Rows without terms are priced at zero.
#[expect(clippy::float_arithmetic, reason = "bound multipliers are priced above the bound")]
pub(crate) fn shadow_prices(model: &FormulationModel) -> Result<Vec<f64>, microlp::Error> {
    let mut dual = Problem::new(OptimizationDirection::Maximize);
    let prices: Vec<Option<Variable>> = model
        .constraints()
        .map(|(_, row)| {
            if row.terms.is_empty() {
                return None;
            }
            let bounds = match row.sense {
                Sense::Ge => (0.0, f64::INFINITY),
                Sense::Le => (f64::NEG_INFINITY, 0.0),
                Sense::Eq => (f64::NEG_INFINITY, f64::INFINITY),
            };
            Some(dual.add_var(row.rhs, bounds))
        })
        .collect();
    if prices.iter().all(Option::is_none) {
        return Ok(vec![0.0; prices.len()]);
    }

    let mut columns: Vec<Vec<(Variable, f64)>> = vec![Vec::new(); model.num_variables()];
    for ((_, row), price) in model.constraints().zip(&prices) {
        let Some(price) = price else { continue };
        for (var, coeff) in &row.terms {
            if let Some(column) = columns.get_mut(var.index()) {
                column.push((*price, *coeff));
            }
        }
    }

    for ((_, var), mut column) in model.variables().zip(columns) {
        if var.upper.is_finite() {
            let ceiling = dual.add_var(-(var.upper + BOUND_SLACK), (0.0, f64::INFINITY));
            column.push((ceiling, -1.0));
        }
        let op = if !var.lower.is_finite() {
            ComparisonOp::Eq
        } else if var.lower.abs() > f64::EPSILON {
            let floor = dual.add_var(var.lower, (0.0, f64::INFINITY));
            column.push((floor, 1.0));
            ComparisonOp::Eq
        } else {
            ComparisonOp::Le
        };
        if column.is_empty() {
            continue;
        }
        dual.add_constraint(column, op, var.cost);
    }

    let solution = dual.solve()?;
    Ok(prices
        .iter()
        .map(|price| price.map_or(0.0, |var| solution[var]))
        .collect())
}
