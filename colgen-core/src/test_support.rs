//! Builders for small graphs and pools used by unit and behaviour tests.

use crate::{Graph, Node, Route, RoutePool};

/// Graph where every listed customer has unit demand.
///
/// # Examples
/// ```rust
/// use colgen_core::test_support::unit_graph;
///
/// let graph = unit_graph([1, 2, 3]);
/// assert_eq!(graph.routable().count(), 3);
/// ```
#[must_use]
pub fn unit_graph(customers: impl IntoIterator<Item = u64>) -> Graph {
    customers
        .into_iter()
        .map(|id| (id, unit_node()))
        .collect()
}

/// Route through `customers` operated by `vehicle_type`.
///
/// # Panics
///
/// Panics when the route is invalid, e.g. its cost is not finite.
#[must_use]
#[expect(clippy::expect_used, reason = "test helpers fail loudly on bad fixtures")]
pub fn route(name: &str, customers: &[u64], cost: f64, vehicle_type: usize) -> Route {
    Route::through(name, customers.iter().copied(), cost, vehicle_type)
        .expect("test route should be valid")
}

/// Pool built from `(name, customers, cost)` triples on vehicle type 0.
///
/// # Panics
///
/// Panics when two routes share a name.
#[must_use]
#[expect(clippy::expect_used, reason = "test helpers fail loudly on bad fixtures")]
pub fn pool(routes: &[(&str, &[u64], f64)]) -> RoutePool {
    RoutePool::from_routes(
        routes
            .iter()
            .map(|(name, customers, cost)| route(name, customers, *cost, 0)),
    )
    .expect("test route names should be unique")
}

#[expect(clippy::expect_used, reason = "unit demand is always valid")]
fn unit_node() -> Node {
    Node::new(1.0).expect("unit demand is valid")
}
