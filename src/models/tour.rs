//! Tour and serviced-edge types.

use serde::Serialize;

use super::RoadEdge;

/// A required street serviced within a tour.
///
/// Records the traversal direction and the timing of the service, plus the
/// deadhead (unproductive travel) needed to reach it from the previous
/// position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicedEdge {
    /// The street, with its original endpoints and attributes.
    pub edge: RoadEdge,
    /// Node where service starts.
    pub from: usize,
    /// Node where service ends (the new vehicle position).
    pub to: usize,
    /// Metres travelled without servicing to reach `from`.
    pub deadhead: f64,
    /// Time (h) at which service starts.
    pub start_hours: f64,
    /// Time (h) at which service ends.
    pub end_hours: f64,
}

/// One vehicle trip: leaves the depot, services an ordered sequence of
/// streets, and returns to the depot.
///
/// Tours are built by the solvers; once closed, their metrics are final.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::Tour;
///
/// let tour = Tour::new(0, 0, 8.0);
/// assert!(tour.is_empty());
/// assert_eq!(tour.position(), 0);
/// assert_eq!(tour.utilization_percent(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    id: usize,
    depot: usize,
    capacity_hours: f64,
    edges: Vec<ServicedEdge>,
    position: usize,
    serviced_m: f64,
    deadhead_m: f64,
    time_hours: f64,
    closed: bool,
}

impl Tour {
    /// Opens an empty tour at `depot` with the given time budget.
    pub fn new(id: usize, depot: usize, capacity_hours: f64) -> Self {
        Self {
            id,
            depot,
            capacity_hours,
            edges: Vec::new(),
            position: depot,
            serviced_m: 0.0,
            deadhead_m: 0.0,
            time_hours: 0.0,
            closed: false,
        }
    }

    /// Drives `deadhead` metres to `from`, then services `edge` to `to`.
    pub(crate) fn service(&mut self, edge: &RoadEdge, from: usize, deadhead: f64, speed_kmh: f64) {
        debug_assert!(!self.closed, "cannot extend a closed tour");
        let to = edge.other(from).unwrap_or(from);
        let start_hours = self.time_hours + deadhead / 1000.0 / speed_kmh;
        let end_hours = start_hours + edge.length_km() / speed_kmh;
        self.edges.push(ServicedEdge {
            edge: edge.clone(),
            from,
            to,
            deadhead,
            start_hours,
            end_hours,
        });
        self.serviced_m += edge.length();
        self.deadhead_m += deadhead;
        self.time_hours = end_hours;
        self.position = to;
    }

    /// Adds the return trip of `return_m` metres and freezes the tour.
    pub(crate) fn close(&mut self, return_m: f64, speed_kmh: f64) {
        if !self.closed {
            if self.position != self.depot {
                self.deadhead_m += return_m;
                self.time_hours += return_m / 1000.0 / speed_kmh;
                self.position = self.depot;
            }
            self.closed = true;
        }
    }

    /// Tour number within its solution.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Start and end node.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Serviced streets in service order.
    pub fn edges(&self) -> &[ServicedEdge] {
        &self.edges
    }

    /// Ids of the serviced streets in service order.
    pub fn edge_ids(&self) -> Vec<usize> {
        self.edges.iter().map(|s| s.edge.id()).collect()
    }

    /// Number of serviced streets.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the tour services nothing.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Current vehicle position (the depot once closed).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` once the return trip has been added.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total distance driven in km (service + deadhead + return).
    pub fn distance_km(&self) -> f64 {
        (self.serviced_m + self.deadhead_m) / 1000.0
    }

    /// Serviced distance in km.
    pub fn serviced_km(&self) -> f64 {
        self.serviced_m / 1000.0
    }

    /// Deadhead distance in km, including the return trip.
    pub fn deadhead_km(&self) -> f64 {
        self.deadhead_m / 1000.0
    }

    /// Elapsed time in hours.
    pub fn time_hours(&self) -> f64 {
        self.time_hours
    }

    /// Time budget this tour was built against.
    pub fn capacity_hours(&self) -> f64 {
        self.capacity_hours
    }

    /// Share of the time budget used, in percent.
    pub fn utilization_percent(&self) -> f64 {
        if self.capacity_hours > 0.0 {
            self.time_hours / self.capacity_hours * 100.0
        } else {
            0.0
        }
    }

    /// Serviced km per hour of tour time (0 for an empty tour).
    pub fn efficiency(&self) -> f64 {
        if self.time_hours > 0.0 {
            self.serviced_km() / self.time_hours
        } else {
            0.0
        }
    }
}
