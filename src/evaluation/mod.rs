//! Tour evaluation, solution statistics, and fleet costing.
//!
//! - [`evaluator`] — Orients serviced edges and computes tour time
//! - [`quality`] — Aggregate statistics over a solution
//! - [`walk`] — Full node walk of a tour for rendering
//! - [`cost`] — Fleet operating cost

pub mod cost;
pub mod evaluator;
pub mod quality;
pub mod walk;

pub use cost::{drone_cost, fleet_cost, FleetCost, PlowType, VehicleUsage, DEFAULT_BUDGET};
pub use evaluator::TourEvaluator;
pub use quality::{analyze_solution_quality, QualityReport, SolutionQuality};
pub use walk::expand_tour;
