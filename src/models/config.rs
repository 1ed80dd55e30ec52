//! Solver configuration values.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Candidate scoring rule for the path-scanning heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefer the edge closest to the current position.
    Nearest,
    /// Prefer the edge with the shortest service time.
    Cheapest,
    /// Prefer the edge with the best length per hour of access + service.
    #[default]
    Mixed,
    /// Uniform random preference (baseline only).
    Random,
}

impl Strategy {
    /// All strategies, in benchmark order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Nearest,
        Strategy::Cheapest,
        Strategy::Mixed,
        Strategy::Random,
    ];

    /// Lowercase name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Nearest => "nearest",
            Strategy::Cheapest => "cheapest",
            Strategy::Mixed => "mixed",
            Strategy::Random => "random",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Strategy::Nearest),
            "cheapest" => Ok(Strategy::Cheapest),
            "mixed" => Ok(Strategy::Mixed),
            "random" => Ok(Strategy::Random),
            other => Err(RoutingError::InvalidConfig(format!(
                "unknown strategy '{}'",
                other
            ))),
        }
    }
}

/// Configuration of one capacitated arc routing solve.
///
/// Passed by reference to every solve call; solvers never mutate it, so the
/// same value can drive several concurrent runs.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{CarpConfig, Strategy};
///
/// let cfg = CarpConfig::default()
///     .with_capacity_hours(6.0)
///     .with_speed_kmh(12.0)
///     .with_depot(3)
///     .with_strategy(Strategy::Nearest);
/// assert_eq!(cfg.capacity_hours(), 6.0);
/// assert_eq!(cfg.depot(), 3);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarpConfig {
    capacity_hours: f64,
    speed_kmh: f64,
    depot: usize,
    strategy: Strategy,
    seed: u64,
    improve: bool,
    max_improve_iterations: usize,
    time_limit: Option<Duration>,
}

impl Default for CarpConfig {
    /// 8 h shifts at 10 km/h from node 0, mixed scoring, local search on.
    fn default() -> Self {
        Self {
            capacity_hours: 8.0,
            speed_kmh: 10.0,
            depot: 0,
            strategy: Strategy::Mixed,
            seed: 42,
            improve: true,
            max_improve_iterations: 100,
            time_limit: None,
        }
    }
}

impl CarpConfig {
    /// Sets the per-tour time budget in hours.
    pub fn with_capacity_hours(mut self, hours: f64) -> Self {
        self.capacity_hours = hours;
        self
    }

    /// Sets the vehicle speed in km/h, used for both service and deadhead.
    pub fn with_speed_kmh(mut self, speed: f64) -> Self {
        self.speed_kmh = speed;
        self
    }

    /// Sets the depot node where every tour starts and ends.
    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }

    /// Sets the scoring strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the seed used by [`Strategy::Random`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables the local improvement pass.
    pub fn with_improve(mut self, improve: bool) -> Self {
        self.improve = improve;
        self
    }

    /// Caps the number of local improvement iterations.
    pub fn with_max_improve_iterations(mut self, iterations: usize) -> Self {
        self.max_improve_iterations = iterations;
        self
    }

    /// Sets a wall-clock limit for the scanning loop.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Per-tour time budget in hours.
    pub fn capacity_hours(&self) -> f64 {
        self.capacity_hours
    }

    /// Vehicle speed in km/h.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Depot node.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Scoring strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Seed for the random strategy.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether local improvement runs after construction.
    pub fn improve(&self) -> bool {
        self.improve
    }

    /// Maximum number of local improvement iterations.
    pub fn max_improve_iterations(&self) -> usize {
        self.max_improve_iterations
    }

    /// Wall-clock limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Hours needed to cover `metres` at the configured speed.
    pub fn hours_for(&self, metres: f64) -> f64 {
        metres / 1000.0 / self.speed_kmh
    }

    /// Checks that capacity and speed are positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !self.capacity_hours.is_finite() || self.capacity_hours <= 0.0 {
            return Err(RoutingError::InvalidConfig(format!(
                "capacity must be a positive number of hours, got {}",
                self.capacity_hours
            )));
        }
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(RoutingError::InvalidConfig(format!(
                "speed must be a positive number of km/h, got {}",
                self.speed_kmh
            )));
        }
        Ok(())
    }
}

/// Configuration of a Chinese Postman solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostmanConfig {
    depot: Option<usize>,
}

impl PostmanConfig {
    /// Starts and ends the circuit at `depot`.
    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = Some(depot);
        self
    }

    /// Requested start node, if any.
    pub fn depot(&self) -> Option<usize> {
        self.depot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = CarpConfig::default();
        assert_eq!(cfg.capacity_hours(), 8.0);
        assert_eq!(cfg.speed_kmh(), 10.0);
        assert_eq!(cfg.depot(), 0);
        assert_eq!(cfg.strategy(), Strategy::Mixed);
        assert!(cfg.improve());
        assert_eq!(cfg.max_improve_iterations(), 100);
        assert!(cfg.time_limit().is_none());
    }

    #[test]
    fn test_hours_for() {
        let cfg = CarpConfig::default();
        // 2 km at 10 km/h
        assert!((cfg.hours_for(2000.0) - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(CarpConfig::default().with_capacity_hours(0.0).validate().is_err());
        assert!(CarpConfig::default().with_speed_kmh(-1.0).validate().is_err());
        assert!(CarpConfig::default()
            .with_speed_kmh(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Nearest".parse::<Strategy>(), Ok(Strategy::Nearest));
        assert_eq!("random".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("greedy".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Cheapest.to_string(), "cheapest");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let cfg = CarpConfig::default()
            .with_strategy(Strategy::Cheapest)
            .with_depot(4);
        let json = serde_json::to_string(&cfg).expect("serialize");
        assert!(json.contains("\"cheapest\""));
        let back: CarpConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let cfg: CarpConfig = serde_json::from_str(r#"{"capacity_hours": 4.0}"#).expect("valid");
        assert_eq!(cfg.capacity_hours(), 4.0);
        assert_eq!(cfg.speed_kmh(), 10.0);
    }

    #[test]
    fn test_postman_config() {
        assert_eq!(PostmanConfig::default().depot(), None);
        assert_eq!(PostmanConfig::default().with_depot(2).depot(), Some(2));
    }
}
