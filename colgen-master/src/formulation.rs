//! Master Problem Formulator.
//!
//! Builds the set-covering relaxation or the set-partitioning integer
//! program over a route pool. In the relaxation, periodic rows and fleet
//! bounds receive elastic slack penalised by [`BIG_M`], so it is always
//! solvable and any slack left in its optimum flags a pool that cannot yet
//! serve the real problem. The integer program has no slack: such a pool
//! makes it infeasible.

use std::collections::BTreeMap;

use colgen_core::{
    FormulationModel, GENERATED_PREFIX, Graph, MasterConfig, RoutePool, RowRole, Sense, VarId,
    VarKind, VarRole,
};

/// Objective penalty of one unit of artificial slack.
pub const BIG_M: f64 = 1e10;

/// Whether selection variables are continuous or binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Continuous covering (`>=`) relaxation, used for pricing.
    Relaxed,
    /// Binary partitioning (`==`) program.
    Integer,
}

impl ModelKind {
    const fn var_kind(self) -> VarKind {
        match self {
            Self::Relaxed => VarKind::Continuous,
            Self::Integer => VarKind::Binary,
        }
    }

    const fn cover_sense(self) -> Sense {
        match self {
            Self::Relaxed => Sense::Ge,
            Self::Integer => Sense::Eq,
        }
    }
}

/// Mode flags shaping the formulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulationOptions {
    /// Cover each customer `frequency` times.
    pub periodic: bool,
    /// Penalty per dropped customer; `None` forbids dropping.
    pub drop_penalty: Option<f64>,
    /// Fleet size per vehicle type.
    pub num_vehicles: Option<Vec<u32>>,
    /// Turn fleet bounds into equalities.
    pub use_all_vehicles: bool,
}

impl From<&MasterConfig> for FormulationOptions {
    fn from(config: &MasterConfig) -> Self {
        Self {
            periodic: config.periodic,
            drop_penalty: config.drop_penalty,
            num_vehicles: config.num_vehicles.clone(),
            use_all_vehicles: config.use_all_vehicles,
        }
    }
}

/// Build the master problem over `pool`.
///
/// Every routable customer of `graph` gets exactly one covering row, even
/// when no pooled route visits it.
///
/// # Examples
/// ```
/// use colgen_core::test_support::{pool, unit_graph};
/// use colgen_master::{FormulationOptions, ModelKind, formulate};
///
/// let graph = unit_graph([1, 2]);
/// let routes = pool(&[("r1", &[1, 2], 10.0)]);
/// let model = formulate(&routes, &graph, &FormulationOptions::default(), ModelKind::Relaxed);
/// assert_eq!(model.num_variables(), 1);
/// assert_eq!(model.num_constraints(), 2);
/// ```
#[must_use]
pub fn formulate(
    pool: &RoutePool,
    graph: &Graph,
    options: &FormulationOptions,
    kind: ModelKind,
) -> FormulationModel {
    let mut model = FormulationModel::new();
    let selection: Vec<VarId> = pool
        .iter()
        .enumerate()
        .map(|(idx, route)| {
            model.add_variable(
                route.name(),
                VarRole::Route(idx),
                kind.var_kind(),
                1.0,
                route.cost(),
            )
        })
        .collect();

    let mut visitors: BTreeMap<u64, Vec<VarId>> = BTreeMap::new();
    for (route, var) in pool.iter().zip(&selection) {
        for customer in route.customers() {
            visitors.entry(customer).or_default().push(*var);
        }
    }

    add_covering_rows(&mut model, graph, &visitors, options, kind);
    if let Some(fleet) = &options.num_vehicles {
        add_fleet_rows(&mut model, pool, &selection, fleet, options, kind);
    }
    log::debug!(
        "formulated {kind:?} master: {} variables, {} rows over {} routes",
        model.num_variables(),
        model.num_constraints(),
        pool.len()
    );
    model
}

fn add_covering_rows(
    model: &mut FormulationModel,
    graph: &Graph,
    visitors: &BTreeMap<u64, Vec<VarId>>,
    options: &FormulationOptions,
    kind: ModelKind,
) {
    for (id, node) in graph.routable() {
        let mut terms: Vec<(VarId, f64)> = visitors
            .get(&id)
            .map(|vars| vars.iter().map(|var| (*var, 1.0)).collect())
            .unwrap_or_default();
        let rhs = if options.periodic {
            f64::from(node.frequency())
        } else {
            1.0
        };
        if let Some(penalty) = options.drop_penalty
            && node.demand() > 0.0
        {
            let drop = model.add_variable(
                format!("{GENERATED_PREFIX}drop_{id}"),
                VarRole::Drop(id),
                kind.var_kind(),
                1.0,
                penalty,
            );
            // A dropped customer satisfies its row on its own.
            terms.push((drop, rhs));
        }
        if kind == ModelKind::Relaxed && options.periodic && node.frequency() > 1 {
            let slack = model.add_variable(
                format!("{GENERATED_PREFIX}artificial_periodic_{id}"),
                VarRole::PeriodicSlack(id),
                VarKind::Continuous,
                f64::INFINITY,
                BIG_M,
            );
            terms.push((slack, 1.0));
        }
        model.add_constraint(
            format!("visit_node_{id}"),
            RowRole::Cover(id),
            terms,
            kind.cover_sense(),
            rhs,
        );
    }
}

fn add_fleet_rows(
    model: &mut FormulationModel,
    pool: &RoutePool,
    selection: &[VarId],
    fleet: &[u32],
    options: &FormulationOptions,
    kind: ModelKind,
) {
    for (vehicle_type, count) in fleet.iter().enumerate() {
        let mut terms: Vec<(VarId, f64)> = pool
            .iter()
            .zip(selection)
            .filter(|(route, _)| route.vehicle_type() == vehicle_type)
            .map(|(_, var)| (*var, 1.0))
            .collect();
        // Integer solves keep the bound hard: the slack is the constant 0.
        if kind == ModelKind::Relaxed {
            let over = model.add_variable(
                format!("{GENERATED_PREFIX}artificial_bound_{vehicle_type}"),
                VarRole::VehicleSlack(vehicle_type),
                VarKind::Continuous,
                f64::INFINITY,
                BIG_M,
            );
            terms.push((over, -1.0));
            if options.use_all_vehicles {
                let under = model.add_variable(
                    format!("{GENERATED_PREFIX}artificial_bound_under_{vehicle_type}"),
                    VarRole::VehicleSlack(vehicle_type),
                    VarKind::Continuous,
                    f64::INFINITY,
                    BIG_M,
                );
                terms.push((under, 1.0));
            }
        }
        let sense = if options.use_all_vehicles {
            Sense::Eq
        } else {
            Sense::Le
        };
        model.add_constraint(
            format!("vehicle_bound_{vehicle_type}"),
            RowRole::VehicleBound(vehicle_type),
            terms,
            sense,
            f64::from(*count),
        );
    }
}
