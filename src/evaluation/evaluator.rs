//! Tour evaluator that orients serviced edges and computes time and distance.

use crate::distance::ShortestPaths;
use crate::error::Result;
use crate::models::{CarpConfig, RoadEdge, Tour};

/// Rebuilds tours from ordered edge sequences.
///
/// Each edge is entered at whichever endpoint is nearer to the current
/// position (ties go to the lower node id `u`), serviced to the other
/// endpoint, and the tour finally returns to the depot.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{CarpConfig, RoadGraph};
/// use u_arc_routing::distance::ShortestPaths;
/// use u_arc_routing::evaluation::TourEvaluator;
///
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 1000.0, true).unwrap();
/// g.add_edge(1, 2, 1000.0, true).unwrap();
/// let sp = ShortestPaths::new(&g);
/// let config = CarpConfig::default();
///
/// let evaluator = TourEvaluator::new(&sp, &config);
/// let tour = evaluator.build_tour(0, g.edges()).unwrap();
/// // 2 km serviced out, 2 km deadhead back at 10 km/h
/// assert!((tour.time_hours() - 0.4).abs() < 1e-10);
/// ```
pub struct TourEvaluator<'a> {
    oracle: &'a ShortestPaths,
    config: &'a CarpConfig,
}

impl<'a> TourEvaluator<'a> {
    /// Creates an evaluator over a shortest path table and configuration.
    pub fn new(oracle: &'a ShortestPaths, config: &'a CarpConfig) -> Self {
        Self { oracle, config }
    }

    /// Configuration the evaluator prices tours with.
    pub fn config(&self) -> &CarpConfig {
        self.config
    }

    /// Entry node and deadhead metres for servicing `edge` from `position`.
    pub fn orient(&self, position: usize, edge: &RoadEdge) -> Result<(usize, f64)> {
        let (u, v) = edge.endpoints();
        let du = self.oracle.raw_distance(position, u);
        let dv = self.oracle.raw_distance(position, v);
        if du <= dv {
            Ok((u, self.oracle.distance(position, u)?))
        } else {
            Ok((v, dv))
        }
    }

    /// Builds a closed tour servicing `edges` in order.
    pub fn build_tour(&self, id: usize, edges: &[RoadEdge]) -> Result<Tour> {
        let depot = self.config.depot();
        let speed = self.config.speed_kmh();
        let mut tour = Tour::new(id, depot, self.config.capacity_hours());
        for edge in edges {
            let (entry, deadhead) = self.orient(tour.position(), edge)?;
            tour.service(edge, entry, deadhead, speed);
        }
        let back = self.oracle.distance(tour.position(), depot)?;
        tour.close(back, speed);
        Ok(tour)
    }

    /// Total time in hours of the closed tour servicing `edges` in order.
    ///
    /// Equal to `build_tour(..).time_hours()` without allocating a tour.
    pub fn tour_time(&self, edges: &[RoadEdge]) -> Result<f64> {
        let depot = self.config.depot();
        let mut position = depot;
        let mut metres = 0.0;
        for edge in edges {
            let (entry, deadhead) = self.orient(position, edge)?;
            metres += deadhead + edge.length();
            position = edge.other(entry).unwrap_or(entry);
        }
        if position != depot {
            metres += self.oracle.distance(position, depot)?;
        }
        Ok(self.config.hours_for(metres))
    }

    /// Returns `true` if `hours` fits the per-tour capacity.
    pub fn fits(&self, hours: f64) -> bool {
        hours <= self.config.capacity_hours() + 1e-9
    }
}
