//! Aggregate statistics over a CARP solution.

use serde::Serialize;

use crate::models::Solution;

/// Summary metrics of a non-empty solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Number of tours.
    pub num_routes: usize,
    /// Total driven distance in km.
    pub total_distance_km: f64,
    /// Total tour time in hours.
    pub total_time_hours: f64,
    /// Mean utilization over tours, in percent.
    pub avg_utilization_percent: f64,
    /// Longest tour time in hours.
    pub max_route_time: f64,
    /// Shortest tour time in hours.
    pub min_route_time: f64,
    /// `max_route_time - min_route_time`.
    pub time_balance: f64,
    /// Driven km per hour over the whole plan (0 when no time was spent).
    ///
    /// Every km is driven at the configured speed, so this equals
    /// `speed_kmh` for any non-empty plan. See `service_efficiency` for a
    /// figure that reflects deadheading.
    pub efficiency_score: f64,
    /// Serviced km per hour over the whole plan (0 when no time was spent).
    pub service_efficiency: f64,
}

/// Result of [`analyze_solution_quality`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolutionQuality {
    /// The solution has no tours.
    NoData,
    /// Metrics of a solution with at least one tour.
    Summary(QualityReport),
}

impl SolutionQuality {
    /// The report, if the solution had tours.
    pub fn report(&self) -> Option<&QualityReport> {
        match self {
            SolutionQuality::NoData => None,
            SolutionQuality::Summary(report) => Some(report),
        }
    }
}

/// Computes summary statistics for `solution`.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::Solution;
/// use u_arc_routing::evaluation::{analyze_solution_quality, SolutionQuality};
///
/// let empty = Solution::new(8.0);
/// assert_eq!(analyze_solution_quality(&empty), SolutionQuality::NoData);
/// ```
pub fn analyze_solution_quality(solution: &Solution) -> SolutionQuality {
    let tours = solution.tours();
    if tours.is_empty() {
        return SolutionQuality::NoData;
    }

    let total_distance_km = solution.total_distance_km();
    let total_time_hours = solution.total_time_hours();
    let avg_utilization_percent =
        tours.iter().map(|t| t.utilization_percent()).sum::<f64>() / tours.len() as f64;
    let max_route_time = tours
        .iter()
        .map(|t| t.time_hours())
        .fold(f64::NEG_INFINITY, f64::max);
    let min_route_time = tours
        .iter()
        .map(|t| t.time_hours())
        .fold(f64::INFINITY, f64::min);
    let per_hour = |km: f64| {
        if total_time_hours > 0.0 {
            km / total_time_hours
        } else {
            0.0
        }
    };

    SolutionQuality::Summary(QualityReport {
        num_routes: tours.len(),
        total_distance_km,
        total_time_hours,
        avg_utilization_percent,
        max_route_time,
        min_route_time,
        time_balance: max_route_time - min_route_time,
        efficiency_score: per_hour(total_distance_km),
        service_efficiency: per_hour(solution.serviced_km()),
    })
}
