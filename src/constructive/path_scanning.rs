//! Path-scanning heuristic for the Capacitated Arc Routing Problem.
//!
//! # Algorithm
//!
//! Tours are built one at a time from the depot. At every step each
//! unserved required edge is scored from the current position according to
//! the configured [`Strategy`], and the best-scoring edge is serviced if the
//! tour can still return to the depot within its time budget. Otherwise the
//! tour is closed and a new one is opened.
//!
//! # Complexity
//!
//! O(R²) candidate evaluations for R required edges, on top of the shortest
//! path table.
//!
//! # Reference
//!
//! Golden, B. L., DeArmon, J. S. & Baker, E. K. (1983). "Computational
//! experiments with algorithms for a class of routing problems",
//! *Computers & Operations Research* 10(1), 47-59.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::ShortestPaths;
use crate::error::{Result, RoutingError};
use crate::models::{CarpConfig, RoadEdge, RoadGraph, Solution, Strategy, Tour};

const MIXED_EPSILON: f64 = 0.01;

/// One unserved edge as seen from the current position.
#[derive(Debug, Clone, Copy)]
struct ScanCandidate {
    slot: usize,
    entry: usize,
    deadhead: f64,
    score: f64,
    needed_hours: f64,
    feasible: bool,
}

/// Builds CARP tours with the path-scanning heuristic.
///
/// Every required edge of `graph` ends up in exactly one tour, and every
/// closed tour (return trip included) fits within
/// [`CarpConfig::capacity_hours`]. A graph without required edges yields an
/// empty solution.
///
/// # Errors
///
/// - [`RoutingError::InvalidConfig`] for a bad configuration or a shortest
///   path table of the wrong size
/// - [`RoutingError::UnknownNode`] if the depot is not a node
/// - [`RoutingError::CapacityViolation`] if a required edge cannot fit in
///   any tour
/// - [`RoutingError::Unreachable`] if a required edge cannot be reached from
///   the depot
/// - [`RoutingError::DeadlineExceeded`] if the configured time limit elapses
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{CarpConfig, RoadGraph, Strategy};
/// use u_arc_routing::distance::ShortestPaths;
/// use u_arc_routing::constructive::path_scanning;
///
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 2000.0, true).unwrap();
/// g.add_edge(1, 2, 3000.0, true).unwrap();
/// let sp = ShortestPaths::new(&g);
///
/// let config = CarpConfig::default().with_strategy(Strategy::Nearest);
/// let solution = path_scanning(&g, &sp, &config).unwrap();
/// assert_eq!(solution.num_tours(), 1);
/// assert_eq!(solution.serviced_edge_ids(), vec![0, 1]);
/// ```
pub fn path_scanning(
    graph: &RoadGraph,
    oracle: &ShortestPaths,
    config: &CarpConfig,
) -> Result<Solution> {
    config.validate()?;
    if oracle.size() != graph.num_nodes() {
        return Err(RoutingError::InvalidConfig(format!(
            "shortest path table covers {} nodes but the graph has {}",
            oracle.size(),
            graph.num_nodes()
        )));
    }
    let depot = config.depot();
    graph.check_node(depot)?;

    let capacity = config.capacity_hours();
    let required: Vec<&RoadEdge> = graph.required_edges().collect();
    let mut solution = Solution::new(capacity);
    if required.is_empty() {
        log::debug!("path scanning: no required edges");
        return Ok(solution);
    }

    for edge in &required {
        let service = config.hours_for(edge.length());
        if service > capacity {
            return Err(capacity_violation(edge, service, capacity));
        }
    }
    for edge in &required {
        if !oracle.is_reachable(depot, edge.u()) {
            return Err(RoutingError::Unreachable {
                from: depot,
                to: edge.u(),
            });
        }
    }

    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed());
    let mut served = vec![false; required.len()];
    let mut remaining = required.len();
    log::debug!(
        "path scanning: {} required edges, strategy {}, capacity {} h",
        remaining,
        config.strategy(),
        capacity
    );

    while remaining > 0 {
        let mut tour = Tour::new(solution.num_tours(), depot, capacity);

        while remaining > 0 {
            if let Some(limit) = config.time_limit() {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    return Err(RoutingError::DeadlineExceeded { elapsed });
                }
            }

            let candidates = scan(&required, &served, &tour, oracle, config, &mut rng);
            let Some(best) = best_of(candidates.iter()) else {
                if tour.is_empty() {
                    let slot = served.iter().position(|&s| !s).unwrap_or(0);
                    return Err(RoutingError::Unreachable {
                        from: tour.position(),
                        to: required[slot].u(),
                    });
                }
                break;
            };

            let chosen = if best.feasible {
                best
            } else if !tour.is_empty() {
                break;
            } else if let Some(fallback) = best_of(candidates.iter().filter(|c| c.feasible)) {
                log::warn!(
                    "edge {} does not fit a fresh tour, servicing edge {} first",
                    required[best.slot].id(),
                    required[fallback.slot].id()
                );
                fallback
            } else {
                return Err(capacity_violation(
                    required[best.slot],
                    best.needed_hours,
                    capacity,
                ));
            };

            let edge = required[chosen.slot];
            log::trace!(
                "tour {}: service edge {} from node {} (score {:.4})",
                tour.id(),
                edge.id(),
                chosen.entry,
                chosen.score
            );
            tour.service(edge, chosen.entry, chosen.deadhead, config.speed_kmh());
            served[chosen.slot] = true;
            remaining -= 1;
        }

        let back = oracle.distance(tour.position(), depot)?;
        tour.close(back, config.speed_kmh());
        log::debug!(
            "closed tour {}: {} edges, {:.3} h, {:.3} km",
            tour.id(),
            tour.len(),
            tour.time_hours(),
            tour.distance_km()
        );
        solution.add_tour(tour);
    }

    Ok(solution)
}

/// Scores every unserved, reachable edge from the end of `tour`.
fn scan(
    required: &[&RoadEdge],
    served: &[bool],
    tour: &Tour,
    oracle: &ShortestPaths,
    config: &CarpConfig,
    rng: &mut StdRng,
) -> Vec<ScanCandidate> {
    let position = tour.position();
    let depot = config.depot();
    let mut candidates = Vec::new();

    for (slot, edge) in required.iter().enumerate() {
        if served[slot] {
            continue;
        }
        let (u, v) = edge.endpoints();
        let du = oracle.raw_distance(position, u);
        let dv = oracle.raw_distance(position, v);
        let (entry, exit, deadhead) = if du <= dv { (u, v, du) } else { (v, u, dv) };
        if !deadhead.is_finite() {
            continue;
        }

        let min_dist_km = deadhead / 1000.0;
        let service = config.hours_for(edge.length());
        let score = match config.strategy() {
            Strategy::Nearest => -min_dist_km,
            Strategy::Cheapest => -service,
            Strategy::Mixed => edge.length_km() / (min_dist_km + service + MIXED_EPSILON),
            Strategy::Random => rng.random::<f64>(),
        };

        let back = oracle.raw_distance(exit, depot);
        let needed_hours =
            tour.time_hours() + config.hours_for(deadhead) + service + config.hours_for(back);
        candidates.push(ScanCandidate {
            slot,
            entry,
            deadhead,
            score,
            needed_hours,
            feasible: needed_hours <= config.capacity_hours() + 1e-9,
        });
    }

    candidates
}

/// Highest score; ties keep the earliest candidate (lowest edge id).
fn best_of<'c, I>(candidates: I) -> Option<ScanCandidate>
where
    I: Iterator<Item = &'c ScanCandidate>,
{
    let mut best: Option<ScanCandidate> = None;
    for c in candidates {
        if best.is_none_or(|b| c.score > b.score) {
            best = Some(*c);
        }
    }
    best
}

fn capacity_violation(edge: &RoadEdge, required_hours: f64, capacity_hours: f64) -> RoutingError {
    RoutingError::CapacityViolation {
        edge: edge.id(),
        u: edge.u(),
        v: edge.v(),
        required_hours,
        capacity_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Path 0-1-2-3-4-5 where the street (3, 4) needs no service.
    fn path_graph() -> RoadGraph {
        let mut g = RoadGraph::new(6);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        g.add_edge(1, 2, 1500.0, true).expect("valid");
        g.add_edge(2, 3, 2000.0, true).expect("valid");
        g.add_edge(3, 4, 1000.0, false).expect("valid");
        g.add_edge(4, 5, 2500.0, true).expect("valid");
        g
    }

    #[test]
    fn test_path_graph_single_tour() {
        let g = path_graph();
        let sp = ShortestPaths::new(&g);
        for strategy in Strategy::ALL {
            let config = CarpConfig::default().with_strategy(strategy);
            let sol = path_scanning(&g, &sp, &config).expect("feasible");
            assert_eq!(sol.num_tours(), 1, "strategy {}", strategy);
            assert!((sol.serviced_km() - 7.0).abs() < 1e-10);
            assert!(sol.tours()[0].time_hours() <= 8.0);
        }
    }

    #[test]
    fn test_nearest_walks_outward() {
        let g = path_graph();
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default().with_strategy(Strategy::Nearest);
        let sol = path_scanning(&g, &sp, &config).expect("feasible");
        let tour = &sol.tours()[0];
        assert_eq!(tour.edge_ids(), vec![0, 1, 2, 4]);
        // 7 km serviced, 1 km over (3, 4), 8 km back
        assert!((tour.time_hours() - 1.6).abs() < 1e-10);
        assert!((tour.deadhead_km() - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_splits_tours() {
        // Three 2 km spokes: each tour fits exactly one round trip.
        let mut g = RoadGraph::new(4);
        for leaf in 1..4 {
            g.add_edge(0, leaf, 2000.0, true).expect("valid");
        }
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default()
            .with_strategy(Strategy::Nearest)
            .with_capacity_hours(0.5);
        let sol = path_scanning(&g, &sp, &config).expect("feasible");
        assert_eq!(sol.num_tours(), 3);
        assert_eq!(sol.serviced_edge_ids(), vec![0, 1, 2]);
        for (i, tour) in sol.tours().iter().enumerate() {
            assert_eq!(tour.id(), i);
            assert!(tour.is_closed());
            assert!((tour.time_hours() - 0.4).abs() < 1e-10);
        }
    }

    #[test]
    fn test_oversized_edge() {
        let mut g = RoadGraph::new(2);
        g.add_edge(0, 1, 100_000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let err = path_scanning(&g, &sp, &CarpConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::CapacityViolation { edge: 0, u: 0, v: 1, .. }
        ));
    }

    #[test]
    fn test_edge_too_far_from_depot() {
        // Service fits (1 h) but the 40 km approach does not.
        let mut g = RoadGraph::new(3);
        g.add_edge(0, 1, 40_000.0, false).expect("valid");
        g.add_edge(1, 2, 10_000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let err = path_scanning(&g, &sp, &CarpConfig::default()).unwrap_err();
        match err {
            RoutingError::CapacityViolation {
                edge,
                required_hours,
                ..
            } => {
                assert_eq!(edge, 1);
                assert!((required_hours - 10.0).abs() < 1e-10);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_best_candidate_never_fits() {
        // The 70 km spoke outscores the 1 km spoke but needs 14 h with its
        // return leg; the short spoke is serviced and the long one reported.
        let mut g = RoadGraph::new(3);
        g.add_edge(0, 1, 70_000.0, true).expect("valid");
        g.add_edge(0, 2, 1000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        match path_scanning(&g, &sp, &CarpConfig::default()) {
            Err(RoutingError::CapacityViolation {
                edge,
                required_hours,
                capacity_hours,
                ..
            }) => {
                assert_eq!(edge, 0);
                assert!((required_hours - 14.0).abs() < 1e-10);
                assert_eq!(capacity_hours, 8.0);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_required_edge() {
        let mut g = RoadGraph::new(4);
        g.add_edge(0, 1, 100.0, true).expect("valid");
        g.add_edge(2, 3, 100.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        assert_eq!(
            path_scanning(&g, &sp, &CarpConfig::default()).unwrap_err(),
            RoutingError::Unreachable { from: 0, to: 2 }
        );
    }

    #[test]
    fn test_no_required_edges() {
        let mut g = RoadGraph::new(2);
        g.add_edge(0, 1, 100.0, false).expect("valid");
        let sp = ShortestPaths::new(&g);
        let sol = path_scanning(&g, &sp, &CarpConfig::default()).expect("empty");
        assert!(sol.is_empty());
    }

    #[test]
    fn test_unknown_depot() {
        let g = path_graph();
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default().with_depot(42);
        assert_eq!(
            path_scanning(&g, &sp, &config).unwrap_err(),
            RoutingError::UnknownNode { node: 42 }
        );
    }

    #[test]
    fn test_invalid_speed() {
        let g = path_graph();
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default().with_speed_kmh(0.0);
        assert!(matches!(
            path_scanning(&g, &sp, &config),
            Err(RoutingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_deadline() {
        let g = path_graph();
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default().with_time_limit(Duration::ZERO);
        assert!(matches!(
            path_scanning(&g, &sp, &config),
            Err(RoutingError::DeadlineExceeded { .. })
        ));

        let relaxed = CarpConfig::default().with_time_limit(Duration::from_secs(60));
        assert!(path_scanning(&g, &sp, &relaxed).is_ok());
    }

    #[test]
    fn test_random_is_seeded() {
        let mut g = RoadGraph::new(6);
        for i in 0..5 {
            g.add_edge(i, i + 1, 500.0 + 100.0 * i as f64, true).expect("valid");
        }
        g.add_edge(0, 5, 800.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default()
            .with_strategy(Strategy::Random)
            .with_seed(7);
        let a = path_scanning(&g, &sp, &config).expect("feasible");
        let b = path_scanning(&g, &sp, &config).expect("feasible");
        assert_eq!(a.serviced_edge_ids(), b.serviced_edge_ids());
    }

    #[test]
    fn test_ties_prefer_lowest_edge_id() {
        // Two identical spokes: nearest picks edge 0 first.
        let mut g = RoadGraph::new(3);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        g.add_edge(0, 2, 1000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default().with_strategy(Strategy::Nearest);
        let sol = path_scanning(&g, &sp, &config).expect("feasible");
        assert_eq!(sol.serviced_edge_ids(), vec![0, 1]);
    }
}
