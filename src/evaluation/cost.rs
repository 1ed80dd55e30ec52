//! Operating cost of a snow-clearing fleet.
//!
//! Plows pay a daily rental per started day, an hourly wage that switches to
//! an overtime rate after 8 hours, and a per-km running cost. Drones pay a
//! daily rental and a per-km cost. Hours and kilometres are rounded up per
//! vehicle before pricing.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::models::Tour;

/// Budget cap of a clearing operation.
pub const DEFAULT_BUDGET: f64 = 16_000_000.0;

const HOURS_PER_DAY: f64 = 24.0;
const REGULAR_HOURS: f64 = 8.0;
const DRONE_DAILY: f64 = 100.0;
const DRONE_PER_KM: f64 = 0.01;

/// Plow vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlowType {
    /// Light plow.
    TypeI,
    /// Heavy plow.
    TypeII,
}

struct Rates {
    daily: f64,
    hourly: f64,
    overtime: f64,
    per_km: f64,
}

impl PlowType {
    fn rates(self) -> Rates {
        match self {
            PlowType::TypeI => Rates {
                daily: 500.0,
                hourly: 1.1,
                overtime: 1.3,
                per_km: 1.1,
            },
            PlowType::TypeII => Rates {
                daily: 800.0,
                hourly: 1.3,
                overtime: 1.5,
                per_km: 1.3,
            },
        }
    }

    /// Cost of one plow working `hours` over `km`.
    pub fn cost(self, hours: f64, km: f64) -> f64 {
        let r = self.rates();
        let days = (hours / HOURS_PER_DAY).ceil();
        let regular = hours.min(REGULAR_HOURS).ceil();
        let overtime = (hours - REGULAR_HOURS).max(0.0).ceil();
        days * r.daily + regular * r.hourly + overtime * r.overtime + km.ceil() * r.per_km
    }
}

/// Hours and kilometres worked by one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleUsage {
    /// Working time in hours.
    pub hours: f64,
    /// Distance driven or flown in km.
    pub km: f64,
}

impl VehicleUsage {
    /// Usage of `hours` over `km`.
    pub fn new(hours: f64, km: f64) -> Self {
        Self { hours, km }
    }

    /// Usage of a plow driving `tour`.
    pub fn from_tour(tour: &Tour) -> Self {
        Self {
            hours: tour.time_hours(),
            km: tour.distance_km(),
        }
    }
}

/// Cost of one drone flight.
pub fn drone_cost(usage: VehicleUsage) -> f64 {
    (usage.hours / HOURS_PER_DAY).ceil() * DRONE_DAILY + usage.km * DRONE_PER_KM
}

/// Cost breakdown of a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FleetCost {
    /// All drone flights.
    pub drone: f64,
    /// All type I plows.
    pub type_i: f64,
    /// All type II plows.
    pub type_ii: f64,
    /// Sum of the above.
    pub total: f64,
}

/// Prices a fleet of plows and drones.
///
/// # Errors
///
/// [`RoutingError::BudgetExceeded`] if `budget` is given and the total is
/// above it.
///
/// # Examples
///
/// ```
/// use u_arc_routing::evaluation::{fleet_cost, PlowType, VehicleUsage};
///
/// let plows = [(PlowType::TypeI, VehicleUsage::new(9.5, 40.2))];
/// let cost = fleet_cost(&plows, &[], None).unwrap();
/// // 1 day + 8 h + 2 h overtime + 41 km
/// assert!((cost.type_i - (500.0 + 8.8 + 2.6 + 45.1)).abs() < 1e-9);
/// ```
pub fn fleet_cost(
    plows: &[(PlowType, VehicleUsage)],
    drones: &[VehicleUsage],
    budget: Option<f64>,
) -> Result<FleetCost> {
    let mut cost = FleetCost {
        drone: drones.iter().map(|&d| drone_cost(d)).sum(),
        ..FleetCost::default()
    };
    for &(plow, usage) in plows {
        let c = plow.cost(usage.hours, usage.km);
        match plow {
            PlowType::TypeI => cost.type_i += c,
            PlowType::TypeII => cost.type_ii += c,
        }
    }
    cost.total = cost.drone + cost.type_i + cost.type_ii;
    log::debug!(
        "fleet cost: drones {:.2}, type I {:.2}, type II {:.2}",
        cost.drone,
        cost.type_i,
        cost.type_ii
    );

    match budget {
        Some(budget) if cost.total > budget => Err(RoutingError::BudgetExceeded {
            total: cost.total,
            budget,
        }),
        _ => Ok(cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_i_within_regular_hours() {
        // 1 day, 4 h, 12 km
        let c = PlowType::TypeI.cost(3.2, 11.5);
        assert!((c - (500.0 + 4.0 * 1.1 + 12.0 * 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_type_ii_overtime_and_days() {
        // 2 days, 8 regular h, 18 overtime h, 100 km
        let c = PlowType::TypeII.cost(25.5, 100.0);
        let expected = 2.0 * 800.0 + 8.0 * 1.3 + 18.0 * 1.5 + 100.0 * 1.3;
        assert!((c - expected).abs() < 1e-9);
    }

    #[test]
    fn test_idle_vehicle_is_free() {
        assert_eq!(PlowType::TypeI.cost(0.0, 0.0), 0.0);
        assert_eq!(drone_cost(VehicleUsage::default()), 0.0);
    }

    #[test]
    fn test_drone_cost() {
        let c = drone_cost(VehicleUsage::new(30.0, 1500.0));
        assert!((c - (200.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fleet_breakdown() {
        let plows = [
            (PlowType::TypeI, VehicleUsage::new(1.0, 1.0)),
            (PlowType::TypeII, VehicleUsage::new(1.0, 1.0)),
            (PlowType::TypeI, VehicleUsage::new(1.0, 1.0)),
        ];
        let drones = [VehicleUsage::new(2.0, 100.0)];
        let cost = fleet_cost(&plows, &drones, Some(DEFAULT_BUDGET)).expect("within budget");
        assert!((cost.type_i - 2.0 * (500.0 + 1.1 + 1.1)).abs() < 1e-9);
        assert!((cost.type_ii - (800.0 + 1.3 + 1.3)).abs() < 1e-9);
        assert!((cost.drone - 101.0).abs() < 1e-9);
        assert!((cost.total - (cost.drone + cost.type_i + cost.type_ii)).abs() < 1e-9);
    }

    #[test]
    fn test_budget_exceeded() {
        let plows = [(PlowType::TypeII, VehicleUsage::new(1.0, 1.0))];
        assert!(matches!(
            fleet_cost(&plows, &[], Some(500.0)),
            Err(RoutingError::BudgetExceeded { budget, .. }) if budget == 500.0
        ));
    }

    #[test]
    fn test_usage_from_tour() {
        let tour = Tour::new(0, 0, 8.0);
        assert_eq!(VehicleUsage::from_tour(&tour), VehicleUsage::new(0.0, 0.0));
    }
}
