//! Results handed back to the column-generation driver.

use std::collections::BTreeMap;

use crate::route::Route;

/// Key of a shadow price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DualKey {
    /// Covering row of a customer.
    Node(u64),
    /// Fleet bound of a vehicle type.
    Vehicle(usize),
}

/// Shadow prices of a relaxed master solve.
///
/// Covering prices are non-negative; fleet-bound prices are non-positive.
///
/// # Examples
/// ```
/// use colgen_core::{DualKey, DualValues, Route};
///
/// # fn main() -> Result<(), colgen_core::RouteError> {
/// let duals: DualValues = [(DualKey::Node(1), 4.0), (DualKey::Node(2), 3.0)]
///     .into_iter()
///     .collect();
/// let route = Route::through("r", [1, 2], 10.0, 0)?;
/// assert_eq!(duals.reduced_cost(&route), 3.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DualValues {
    prices: BTreeMap<DualKey, f64>,
}

impl DualValues {
    /// Construct an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price.
    pub fn insert(&mut self, key: DualKey, price: f64) {
        self.prices.insert(key, price);
    }

    /// Price of any key.
    #[must_use]
    pub fn get(&self, key: DualKey) -> Option<f64> {
        self.prices.get(&key).copied()
    }

    /// Price of a customer's covering row.
    #[must_use]
    pub fn node(&self, customer: u64) -> Option<f64> {
        self.get(DualKey::Node(customer))
    }

    /// Price of a vehicle type's fleet bound.
    #[must_use]
    pub fn vehicle(&self, vehicle_type: usize) -> Option<f64> {
        self.get(DualKey::Vehicle(vehicle_type))
    }

    /// All prices in key order.
    pub fn iter(&self) -> impl Iterator<Item = (DualKey, f64)> + '_ {
        self.prices.iter().map(|(key, price)| (*key, *price))
    }

    /// Number of prices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no prices were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Route cost minus the prices of the customers it visits and of its
    /// vehicle type. Missing prices count as zero.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "reduced cost subtracts prices")]
    pub fn reduced_cost(&self, route: &Route) -> f64 {
        let visited: f64 = route
            .customers()
            .filter_map(|customer| self.node(customer))
            .sum();
        let fleet = self.vehicle(route.vehicle_type()).unwrap_or(0.0);
        route.cost() - visited - fleet
    }
}

impl FromIterator<(DualKey, f64)> for DualValues {
    fn from_iter<I: IntoIterator<Item = (DualKey, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Integral plan extracted from a solved master problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    /// Cost of the selected routes plus drop penalties.
    pub total_cost: f64,
    /// Selected routes in pool order.
    pub routes: Vec<Route>,
    /// Dropped customers in id order.
    pub dropped_nodes: Vec<u64>,
}

impl Solution {
    /// Names of the selected routes.
    pub fn route_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.routes.iter().map(Route::name)
    }

    /// Number of selected routes visiting `customer`.
    #[must_use]
    pub fn visits(&self, customer: u64) -> usize {
        self.routes
            .iter()
            .filter(|route| route.visits(customer))
            .count()
    }
}
