//! Backend-independent formulation of the restricted master problem.
//!
//! The model is plain data: variables live in an arena addressed by
//! [`VarId`], constraints hold index lists into that arena. Cloning a model
//! is a structural copy, which is what lets a dive work on its own copy
//! while the original stays valid for dual extraction.

use std::collections::HashMap;

/// First character of every variable name not taken from a route.
///
/// [`Route`](crate::Route) names may not start with it, so generated names
/// never collide with route names.
pub const GENERATED_PREFIX: char = '$';

/// Index of a variable in a [`FormulationModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    /// Position in the variable arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a constraint in a [`FormulationModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    /// Position in the constraint list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Integrality of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Real-valued within its bounds.
    Continuous,
    /// Restricted to `{0, 1}`.
    Binary,
}

/// What a variable stands for in the master problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRole {
    /// Selection of the route at this pool index.
    Route(usize),
    /// Dropping this customer.
    Drop(u64),
    /// Elastic slack on a periodic customer's covering row.
    PeriodicSlack(u64),
    /// Elastic slack on a vehicle-type bound.
    VehicleSlack(usize),
}

impl VarRole {
    /// Whether the variable only exists to keep the relaxation feasible.
    #[must_use]
    pub const fn is_artificial(self) -> bool {
        matches!(self, Self::PeriodicSlack(_) | Self::VehicleSlack(_))
    }
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique name.
    pub name: String,
    /// Meaning in the master problem.
    pub role: VarRole,
    /// Integrality.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound; `f64::INFINITY` when unbounded.
    pub upper: f64,
    /// Objective coefficient.
    pub cost: f64,
}

/// Relation between a constraint's left- and right-hand sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
}

impl Sense {
    /// Whether `lhs` satisfies the relation within `tolerance`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "tolerance widens the bound")]
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Self::Ge => lhs >= rhs - tolerance,
            Self::Eq => (lhs - rhs).abs() <= tolerance,
            Self::Le => lhs <= rhs + tolerance,
        }
    }
}

/// What a constraint stands for in the master problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    /// Covering or partitioning row of a customer.
    Cover(u64),
    /// Fleet-size bound of a vehicle type.
    VehicleBound(usize),
    /// Fixing added while diving.
    Fixing(VarId),
}

/// A linear constraint `Σ coeff · var (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Unique name.
    pub name: String,
    /// Meaning in the master problem.
    pub role: RowRole,
    /// Sparse left-hand side; each variable appears at most once.
    pub terms: Vec<(VarId, f64)>,
    /// Relation.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

impl Constraint {
    /// Left-hand side evaluated at `values`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "dot product of terms and values")]
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Minimisation model over an arena of variables.
///
/// # Examples
/// ```
/// use colgen_core::{FormulationModel, RowRole, Sense, VarKind, VarRole};
///
/// let mut model = FormulationModel::new();
/// let y = model.add_variable("r1", VarRole::Route(0), VarKind::Continuous, 1.0, 5.0);
/// model.add_constraint("visit_1", RowRole::Cover(1), vec![(y, 1.0)], Sense::Ge, 1.0);
/// assert_eq!(model.find("r1"), Some(y));
/// assert_eq!(model.objective_value(&[1.0]), 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulationModel {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    by_name: HashMap<String, VarId>,
}

impl FormulationModel {
    /// Construct an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable bounded below by zero.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        role: VarRole,
        kind: VarKind,
        upper: f64,
        cost: f64,
    ) -> VarId {
        let id = VarId(self.variables.len());
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.variables.push(Variable {
            name,
            role,
            kind,
            lower: 0.0,
            upper,
            cost,
        });
        id
    }

    /// Add a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        role: RowRole,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) -> RowId {
        let id = RowId(self.constraints.len());
        self.constraints.push(Constraint {
            name: name.into(),
            role,
            terms,
            sense,
            rhs,
        });
        id
    }

    /// Variable by id.
    #[must_use]
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Variable id by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    /// Variables with their ids, in creation order.
    pub fn variables(&self) -> impl Iterator<Item = (VarId, &Variable)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .map(|(idx, var)| (VarId(idx), var))
    }

    /// Constraints with their ids, in creation order.
    pub fn constraints(&self) -> impl Iterator<Item = (RowId, &Constraint)> + '_ {
        self.constraints
            .iter()
            .enumerate()
            .map(|(idx, row)| (RowId(idx), row))
    }

    /// Number of variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether any variable must take integral values.
    #[must_use]
    pub fn has_integer_variables(&self) -> bool {
        self.variables
            .iter()
            .any(|var| var.kind == VarKind::Binary)
    }

    /// Objective evaluated at `values`; missing entries count as zero.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "dot product of costs and values")]
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(var, value)| var.cost * value)
            .sum()
    }
}
