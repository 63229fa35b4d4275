//! Configuration of a master problem instance.

use std::time::Duration;

use thiserror::Error;

use crate::backend::{Backend, SolveOptions};

/// Default number of fixings before a dive stops.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default number of fixings allowed to deviate from the greedy choice.
pub const DEFAULT_MAX_DISCREPANCY: usize = 1;

/// Settings shared by every solve of a master problem.
///
/// # Examples
/// ```
/// use colgen_core::{Backend, MasterConfig};
///
/// let config = MasterConfig {
///     drop_penalty: Some(1000.0),
///     num_vehicles: Some(vec![2]),
///     ..MasterConfig::default()
/// };
/// assert_eq!(config.backend, Backend::Microlp);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MasterConfig {
    /// LP/MIP engine.
    pub backend: Backend,
    /// Soft time budget per backend call, in seconds.
    pub time_limit_seconds: Option<u64>,
    /// Solve the continuous covering relaxation instead of the integer
    /// partitioning problem.
    pub relax: bool,
    /// Require each customer's `frequency` visits.
    pub periodic: bool,
    /// Penalty paid for each dropped customer; `None` forbids dropping.
    pub drop_penalty: Option<f64>,
    /// Fleet size per vehicle type.
    pub num_vehicles: Option<Vec<u32>>,
    /// Use exactly `num_vehicles[k]` routes of each type.
    pub use_all_vehicles: bool,
    /// Maximum diving depth.
    pub max_depth: usize,
    /// Maximum number of fixings per dive.
    pub max_discrepancy: usize,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            time_limit_seconds: None,
            relax: true,
            periodic: false,
            drop_penalty: None,
            num_vehicles: None,
            use_all_vehicles: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_discrepancy: DEFAULT_MAX_DISCREPANCY,
        }
    }
}

/// Errors returned by [`MasterConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The drop penalty was negative, NaN or infinite.
    #[error("drop penalty must be finite and non-negative, got {0}")]
    InvalidDropPenalty(f64),
    /// A diving budget was zero.
    #[error("{field} must be at least 1")]
    ZeroDivingBudget {
        /// Offending field.
        field: &'static str,
    },
    /// `use_all_vehicles` was set without fleet sizes.
    #[error("use_all_vehicles requires num_vehicles")]
    MissingFleet,
}

impl MasterConfig {
    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(penalty) = self.drop_penalty
            && (!penalty.is_finite() || penalty < 0.0)
        {
            return Err(ConfigError::InvalidDropPenalty(penalty));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDivingBudget { field: "max_depth" });
        }
        if self.max_discrepancy == 0 {
            return Err(ConfigError::ZeroDivingBudget {
                field: "max_discrepancy",
            });
        }
        if self.use_all_vehicles && self.num_vehicles.is_none() {
            return Err(ConfigError::MissingFleet);
        }
        Ok(())
    }

    /// Backend hints derived from this configuration; shadow prices are
    /// requested exactly when the configuration is relaxed.
    #[must_use]
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            time_limit: self.time_limit_seconds.map(Duration::from_secs),
            duals: self.relax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_diving_literature() {
        let config = MasterConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_discrepancy, 1);
        assert!(config.relax);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_drop_penalty(#[case] penalty: f64) {
        let config = MasterConfig {
            drop_penalty: Some(penalty),
            ..MasterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDropPenalty(_))
        ));
    }

    #[rstest]
    fn rejects_zero_discrepancy() {
        let config = MasterConfig {
            max_discrepancy: 0,
            ..MasterConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDivingBudget {
                field: "max_discrepancy"
            })
        );
    }

    #[rstest]
    fn all_vehicles_needs_fleet() {
        let config = MasterConfig {
            use_all_vehicles: true,
            ..MasterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MissingFleet));
    }

    #[rstest]
    fn options_convert_seconds() {
        let config = MasterConfig {
            time_limit_seconds: Some(30),
            relax: false,
            ..MasterConfig::default()
        };
        let options = config.solve_options();
        assert_eq!(options.time_limit, Some(Duration::from_secs(30)));
        assert!(!options.duals);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialises_partial_json() {
        let raw = r#"{"backend": "highs", "relax": false, "num_vehicles": [2, 1]}"#;
        let config: MasterConfig = serde_json::from_str(raw).expect("valid config");
        assert_eq!(config.backend, Backend::Highs);
        assert!(!config.relax);
        assert_eq!(config.num_vehicles, Some(vec![2, 1]));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn unknown_backend_fails_to_deserialise() {
        let raw = r#"{"backend": "gurobi"}"#;
        assert!(serde_json::from_str::<MasterConfig>(raw).is_err());
    }
}
