//! Capacitated Arc Routing solver: path scanning followed by local search.

use crate::constructive::path_scanning;
use crate::distance::ShortestPaths;
use crate::error::Result;
use crate::evaluation::TourEvaluator;
use crate::local_search::improve_tours;
use crate::models::{CarpConfig, RoadGraph, Solution};

/// Plans capacity-limited tours servicing every required edge of `graph`.
///
/// Runs [`path_scanning`] with the configured strategy and, if
/// [`CarpConfig::improve`] is set, improves the tours with relocate and swap
/// moves. The applied moves are available via [`Solution::improvement`].
///
/// # Errors
///
/// Propagates the construction errors of [`path_scanning`]; no partial
/// solution is returned.
///
/// # Examples
///
/// ```
/// use u_arc_routing::carp::solve_carp;
/// use u_arc_routing::models::{CarpConfig, RoadGraph};
/// use u_arc_routing::distance::ShortestPaths;
///
/// let mut g = RoadGraph::new(4);
/// g.add_edge(0, 1, 1000.0, true).unwrap();
/// g.add_edge(1, 2, 1500.0, true).unwrap();
/// g.add_edge(2, 3, 2000.0, false).unwrap();
/// let sp = ShortestPaths::new(&g);
///
/// let solution = solve_carp(&g, &sp, &CarpConfig::default()).unwrap();
/// assert!((solution.serviced_km() - 2.5).abs() < 1e-10);
/// for tour in solution.tours() {
///     assert!(tour.time_hours() <= 8.0);
/// }
/// ```
pub fn solve_carp(graph: &RoadGraph, oracle: &ShortestPaths, config: &CarpConfig) -> Result<Solution> {
    let solution = path_scanning(graph, oracle, config)?;
    if !config.improve() || solution.num_tours() < 2 {
        return Ok(solution);
    }

    let capacity = solution.capacity_hours();
    let before = solution.total_time_hours();
    let evaluator = TourEvaluator::new(oracle, config);
    let (tours, report) = improve_tours(
        &solution.into_tours(),
        &evaluator,
        config.max_improve_iterations(),
    )?;

    let mut improved = Solution::new(capacity);
    for tour in tours {
        improved.add_tour(tour);
    }
    log::debug!(
        "carp: {} tours, {:.3} h -> {:.3} h",
        improved.num_tours(),
        before,
        improved.total_time_hours()
    );
    improved.set_improvement(report);
    Ok(improved)
}
