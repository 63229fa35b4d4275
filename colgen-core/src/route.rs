//! Candidate routes and the pool accumulated across column generation.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::graph::NodeId;
use crate::model::GENERATED_PREFIX;

/// A path from `Source` to `Sink` proposed as a master-problem column.
///
/// Routes are immutable once built; the set of visited customers is derived
/// from the path at construction time.
///
/// # Examples
/// ```
/// use colgen_core::{NodeId, Route};
///
/// # fn main() -> Result<(), colgen_core::RouteError> {
/// let route = Route::through("r1", [1, 2], 10.0, 0)?;
/// assert_eq!(
///     route.path(),
///     &[NodeId::Source, NodeId::Customer(1), NodeId::Customer(2), NodeId::Sink]
/// );
/// assert!(route.visits(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Route {
    name: String,
    path: Vec<NodeId>,
    cost: f64,
    vehicle_type: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    customers: BTreeSet<u64>,
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The route name was empty.
    #[error("route name must not be empty")]
    EmptyName,
    /// The name starts with the prefix reserved for generated variables.
    #[error("route name {name} must not start with '$'")]
    ReservedName {
        /// Offending route.
        name: String,
    },
    /// The path does not start at `Source` and end at `Sink`.
    #[error("route {name} must start at Source and end at Sink")]
    Unbracketed {
        /// Offending route.
        name: String,
    },
    /// A sentinel appeared inside the path.
    #[error("route {name} contains a sentinel between its endpoints")]
    InnerSentinel {
        /// Offending route.
        name: String,
    },
    /// The cost was NaN or infinite.
    #[error("route {name} has non-finite cost {cost}")]
    NonFiniteCost {
        /// Offending route.
        name: String,
        /// Rejected cost.
        cost: f64,
    },
}

impl Route {
    /// Validates and constructs a [`Route`] from a full path.
    pub fn new(
        name: impl Into<String>,
        path: Vec<NodeId>,
        cost: f64,
        vehicle_type: usize,
    ) -> Result<Self, RouteError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RouteError::EmptyName);
        }
        if name.starts_with(GENERATED_PREFIX) {
            return Err(RouteError::ReservedName { name });
        }
        let bracketed = path.len() >= 2
            && path.first() == Some(&NodeId::Source)
            && path.last() == Some(&NodeId::Sink);
        if !bracketed {
            return Err(RouteError::Unbracketed { name });
        }
        let inner = path.get(1..path.len() - 1).unwrap_or_default();
        if inner.iter().any(|node| node.customer().is_none()) {
            return Err(RouteError::InnerSentinel { name });
        }
        if !cost.is_finite() {
            return Err(RouteError::NonFiniteCost { name, cost });
        }
        let customers = inner.iter().filter_map(|node| node.customer()).collect();
        Ok(Self {
            name,
            path,
            cost,
            vehicle_type,
            customers,
        })
    }

    /// Constructs a route visiting `customers` in order between the sentinels.
    pub fn through(
        name: impl Into<String>,
        customers: impl IntoIterator<Item = u64>,
        cost: f64,
        vehicle_type: usize,
    ) -> Result<Self, RouteError> {
        let path = std::iter::once(NodeId::Source)
            .chain(customers.into_iter().map(NodeId::Customer))
            .chain(std::iter::once(NodeId::Sink))
            .collect();
        Self::new(name, path, cost, vehicle_type)
    }

    /// Unique route name; also the name of its selection variable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered path including both sentinels.
    #[must_use]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Route cost.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Index of the vehicle type operating the route.
    #[must_use]
    pub const fn vehicle_type(&self) -> usize {
        self.vehicle_type
    }

    /// Distinct customers visited, in id order.
    pub fn customers(&self) -> impl Iterator<Item = u64> + '_ {
        self.customers.iter().copied()
    }

    /// Whether the route visits `customer`.
    #[must_use]
    pub fn visits(&self, customer: u64) -> bool {
        self.customers.contains(&customer)
    }
}

/// Errors returned by [`RoutePool::push`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A route with the same name is already pooled.
    #[error("route {name} is already in the pool")]
    DuplicateName {
        /// Conflicting name.
        name: String,
    },
}

/// Ordered, append-only set of candidate routes.
///
/// The pool grows between master solves; a single solve works on one
/// snapshot borrowed immutably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePool {
    routes: Vec<Route>,
    names: HashSet<String>,
}

impl RoutePool {
    /// Construct an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route, rejecting duplicate names.
    pub fn push(&mut self, route: Route) -> Result<(), PoolError> {
        if !self.names.insert(route.name().to_owned()) {
            return Err(PoolError::DuplicateName {
                name: route.name().to_owned(),
            });
        }
        self.routes.push(route);
        Ok(())
    }

    /// Build a pool from routes, rejecting duplicate names.
    pub fn from_routes<I>(routes: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = Route>,
    {
        let mut pool = Self::new();
        for route in routes {
            pool.push(route)?;
        }
        Ok(pool)
    }

    /// Route at a pool index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Whether a route with this name is pooled.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Routes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Number of pooled routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RoutePool {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn route_derives_customer_set() {
        let route = Route::through("r", [3, 1, 3], 4.0, 1).expect("valid route");
        let customers: Vec<u64> = route.customers().collect();
        assert_eq!(customers, vec![1, 3]);
        assert_eq!(route.vehicle_type(), 1);
    }

    #[rstest]
    #[case(vec![NodeId::Customer(1), NodeId::Sink])]
    #[case(vec![NodeId::Source, NodeId::Customer(1)])]
    #[case(vec![NodeId::Source])]
    fn route_requires_sentinel_brackets(#[case] path: Vec<NodeId>) {
        let result = Route::new("r", path, 1.0, 0);
        assert!(matches!(result, Err(RouteError::Unbracketed { .. })));
    }

    #[rstest]
    fn route_rejects_inner_sentinel() {
        let path = vec![NodeId::Source, NodeId::Sink, NodeId::Sink];
        let result = Route::new("r", path, 1.0, 0);
        assert!(matches!(result, Err(RouteError::InnerSentinel { .. })));
    }

    #[rstest]
    fn route_rejects_non_finite_cost() {
        let result = Route::through("r", [1], f64::NAN, 0);
        assert!(matches!(result, Err(RouteError::NonFiniteCost { .. })));
    }

    #[rstest]
    #[case("$drop_1")]
    #[case("$artificial_bound_0")]
    fn route_rejects_generated_prefix(#[case] name: &str) {
        let result = Route::through(name, [1], 1.0, 0);
        assert_eq!(
            result,
            Err(RouteError::ReservedName {
                name: name.to_owned()
            })
        );
    }

    #[rstest]
    fn empty_route_is_allowed() {
        let route = Route::through("idle", [], 0.0, 0).expect("valid route");
        assert_eq!(route.customers().count(), 0);
    }

    #[rstest]
    fn pool_rejects_duplicate_names() {
        let mut pool = RoutePool::new();
        pool.push(Route::through("r", [1], 1.0, 0).expect("valid route"))
            .expect("first insert");
        let err = pool
            .push(Route::through("r", [2], 2.0, 0).expect("valid route"))
            .expect_err("duplicate name");
        assert_eq!(err, PoolError::DuplicateName { name: "r".into() });
        assert_eq!(pool.len(), 1);
    }
}
