//! Customer graph consumed by the master problem.
//!
//! The graph only stores customer nodes. The `Source` and `Sink` sentinels
//! are implicit and appear solely inside route paths as [`NodeId::Source`]
//! and [`NodeId::Sink`].

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Identifier of a vertex on a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeId {
    /// Start sentinel shared by every route.
    Source,
    /// A customer node stored in the [`Graph`].
    Customer(u64),
    /// End sentinel shared by every route.
    Sink,
}

impl NodeId {
    /// Customer identifier, or `None` for a sentinel.
    #[must_use]
    pub const fn customer(self) -> Option<u64> {
        match self {
            Self::Customer(id) => Some(id),
            Self::Source | Self::Sink => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("Source"),
            Self::Sink => f.write_str("Sink"),
            Self::Customer(id) => write!(f, "{id}"),
        }
    }
}

/// Attributes of a customer node.
///
/// # Examples
/// ```
/// use colgen_core::Node;
///
/// # fn main() -> Result<(), colgen_core::NodeError> {
/// let node = Node::new(3.0)?.with_frequency(2)?;
/// assert_eq!(node.frequency(), 2);
/// assert!(!node.is_depot_marker());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    demand: f64,
    frequency: Option<u32>,
    depot_marker: bool,
}

/// Errors returned by [`Node`] constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// Demand was negative, NaN or infinite.
    #[error("node demand must be finite and non-negative, got {demand}")]
    InvalidDemand {
        /// Rejected demand.
        demand: f64,
    },
    /// A periodic node must be visited at least once.
    #[error("node frequency must be at least 1")]
    ZeroFrequency,
}

impl Node {
    /// Construct a node with the given demand and no periodic frequency.
    pub fn new(demand: f64) -> Result<Self, NodeError> {
        if !demand.is_finite() || demand < 0.0 {
            return Err(NodeError::InvalidDemand { demand });
        }
        Ok(Self {
            demand,
            frequency: None,
            depot_marker: false,
        })
    }

    /// Construct a depot marker, which never receives a covering constraint.
    #[must_use]
    pub const fn depot_marker() -> Self {
        Self {
            demand: 0.0,
            frequency: None,
            depot_marker: true,
        }
    }

    /// Set the number of visits required in the planning period.
    pub fn with_frequency(mut self, frequency: u32) -> Result<Self, NodeError> {
        if frequency == 0 {
            return Err(NodeError::ZeroFrequency);
        }
        self.frequency = Some(frequency);
        Ok(self)
    }

    /// Quantity requested by the node.
    #[must_use]
    pub const fn demand(&self) -> f64 {
        self.demand
    }

    /// Visits required in a periodic plan; `1` when unset.
    #[must_use]
    pub fn frequency(&self) -> u32 {
        self.frequency.unwrap_or(1)
    }

    /// Whether the node only marks a depot.
    #[must_use]
    pub const fn is_depot_marker(&self) -> bool {
        self.depot_marker
    }
}

/// Read-only customer graph keyed by customer id.
///
/// Iteration is ordered by id so formulations are reproducible.
///
/// # Examples
/// ```
/// use colgen_core::{Graph, Node};
///
/// # fn main() -> Result<(), colgen_core::NodeError> {
/// let mut graph = Graph::new();
/// graph.insert(1, Node::new(1.0)?);
/// graph.insert(100, Node::depot_marker());
/// assert_eq!(graph.routable().count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    nodes: BTreeMap<u64, Node>,
}

impl Graph {
    /// Construct an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a customer node.
    pub fn insert(&mut self, id: u64, node: Node) -> Option<Node> {
        self.nodes.insert(id, node)
    }

    /// Look up a customer node.
    #[must_use]
    pub fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether the graph holds a customer with this id.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Every customer node, depot markers included.
    pub fn nodes(&self) -> impl Iterator<Item = (u64, &Node)> + '_ {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Nodes that must be covered by routes: every customer except depot markers.
    pub fn routable(&self) -> impl Iterator<Item = (u64, &Node)> + '_ {
        self.nodes().filter(|(_, node)| !node.is_depot_marker())
    }

    /// Number of customer nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no customers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<(u64, Node)> for Graph {
    fn from_iter<I: IntoIterator<Item = (u64, Node)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
