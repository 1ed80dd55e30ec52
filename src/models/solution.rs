//! CARP solution type.

use serde::Serialize;

use super::Tour;
use crate::local_search::ImprovementReport;

/// A complete CARP plan: the ordered tours of the fleet.
///
/// Every required edge of the solved graph is serviced by exactly one tour.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{Solution, Tour};
///
/// let mut sol = Solution::new(8.0);
/// assert!(sol.is_empty());
/// sol.add_tour(Tour::new(0, 0, 8.0));
/// assert_eq!(sol.num_tours(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    tours: Vec<Tour>,
    capacity_hours: f64,
    improvement: Option<ImprovementReport>,
}

impl Solution {
    /// Creates an empty solution for tours bounded by `capacity_hours`.
    pub fn new(capacity_hours: f64) -> Self {
        Self {
            tours: Vec::new(),
            capacity_hours,
            improvement: None,
        }
    }

    /// Appends a tour.
    pub fn add_tour(&mut self, tour: Tour) {
        self.tours.push(tour);
    }

    /// Tours in construction order.
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// Number of tours (vehicle trips).
    pub fn num_tours(&self) -> usize {
        self.tours.len()
    }

    /// Returns `true` if the solution has no tours.
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Per-tour time budget.
    pub fn capacity_hours(&self) -> f64 {
        self.capacity_hours
    }

    /// Total driven distance in km.
    pub fn total_distance_km(&self) -> f64 {
        self.tours.iter().map(|t| t.distance_km()).sum()
    }

    /// Total serviced distance in km.
    pub fn serviced_km(&self) -> f64 {
        self.tours.iter().map(|t| t.serviced_km()).sum()
    }

    /// Total time over all tours in hours.
    pub fn total_time_hours(&self) -> f64 {
        self.tours.iter().map(|t| t.time_hours()).sum()
    }

    /// Number of serviced edges over all tours.
    pub fn num_serviced(&self) -> usize {
        self.tours.iter().map(|t| t.len()).sum()
    }

    /// Ids of every serviced edge, tour by tour.
    pub fn serviced_edge_ids(&self) -> Vec<usize> {
        self.tours.iter().flat_map(|t| t.edge_ids()).collect()
    }

    /// Outcome of the local improvement pass, if it ran.
    pub fn improvement(&self) -> Option<&ImprovementReport> {
        self.improvement.as_ref()
    }

    pub(crate) fn set_improvement(&mut self, report: ImprovementReport) {
        self.improvement = Some(report);
    }

    pub(crate) fn into_tours(self) -> Vec<Tour> {
        self.tours
    }
}
