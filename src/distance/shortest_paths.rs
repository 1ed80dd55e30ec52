//! All-pairs shortest paths over a road graph.
//!
//! # Algorithm
//!
//! One `petgraph` Dijkstra search from every node fills a row of the dense
//! distance matrix. Predecessors come from a breadth-first pass over the
//! tight edges (`d[v] == d[u] + w`), visiting neighbors in node-id order, so
//! paths can be rebuilt on demand and ties resolve the same way every run.
//!
//! # Complexity
//!
//! O(V · E log V) time and O(V²) memory. Intended for sector-sized graphs
//! of up to a few thousand nodes.

use std::collections::VecDeque;

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;

use super::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::models::RoadGraph;

const NO_PRED: usize = usize::MAX;

/// Immutable shortest path table for one road graph.
///
/// Unreachable pairs are reported as [`RoutingError::Unreachable`], never as
/// a large number. The table is read-only after construction and can be
/// shared across threads.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::RoadGraph;
/// use u_arc_routing::distance::ShortestPaths;
///
/// let mut g = RoadGraph::new(4);
/// g.add_edge(0, 1, 1.0, false).unwrap();
/// g.add_edge(1, 2, 1.0, false).unwrap();
/// g.add_edge(0, 2, 5.0, false).unwrap();
///
/// let sp = ShortestPaths::new(&g);
/// assert_eq!(sp.distance(0, 2).unwrap(), 2.0);
/// assert_eq!(sp.path(0, 2).unwrap(), vec![0, 1, 2]);
/// assert!(sp.distance(0, 3).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    distances: DistanceMatrix,
    predecessors: Vec<usize>,
    size: usize,
}

impl ShortestPaths {
    /// Runs Dijkstra from every node of `graph`.
    pub fn new(graph: &RoadGraph) -> Self {
        let n = graph.num_nodes();
        let edges = graph.edges();
        let adjacency: Vec<Vec<(usize, usize)>> = (0..n).map(|v| graph.neighbors(v)).collect();
        let mut distances = DistanceMatrix::new(n);
        let mut predecessors = vec![NO_PRED; n * n];
        let mut queue = VecDeque::new();

        for source in 0..n {
            let costs = dijkstra(graph.network(), NodeIndex::new(source), None, |e| {
                edges[*e.weight()].length()
            });
            let dist = distances.row_mut(source);
            for (node, cost) in costs {
                dist[node.index()] = cost;
            }

            let pred = &mut predecessors[source * n..(source + 1) * n];
            let mut seen = vec![false; n];
            seen[source] = true;
            queue.push_back(source);
            while let Some(node) = queue.pop_front() {
                for &(next, edge_id) in &adjacency[node] {
                    if !seen[next] && dist[node] + edges[edge_id].length() == dist[next] {
                        seen[next] = true;
                        pred[next] = node;
                        queue.push_back(next);
                    }
                }
            }
        }

        log::debug!("shortest path table built for {} nodes", n);

        Self {
            distances,
            predecessors,
            size: n,
        }
    }

    /// Number of nodes covered by the table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Shortest path length from `from` to `to`.
    pub fn distance(&self, from: usize, to: usize) -> Result<f64> {
        self.check(from)?;
        self.check(to)?;
        let d = self.distances.get(from, to);
        if d.is_finite() {
            Ok(d)
        } else {
            Err(RoutingError::Unreachable { from, to })
        }
    }

    /// Shortest path length, `f64::INFINITY` when unreachable or when
    /// either node is out of range.
    pub fn raw_distance(&self, from: usize, to: usize) -> f64 {
        if from < self.size && to < self.size {
            self.distances.get(from, to)
        } else {
            f64::INFINITY
        }
    }

    /// Returns `true` if a path connects `from` and `to`.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        from < self.size && to < self.size && self.distances.get(from, to).is_finite()
    }

    /// Node sequence of a shortest path, including both ends.
    pub fn path(&self, from: usize, to: usize) -> Result<Vec<usize>> {
        self.distance(from, to)?;
        let row = &self.predecessors[from * self.size..(from + 1) * self.size];
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = row[current];
            if current == NO_PRED {
                return Err(RoutingError::Unreachable { from, to });
            }
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }

    /// Underlying distance matrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.distances
    }

    fn check(&self, node: usize) -> Result<()> {
        if node < self.size {
            Ok(())
        } else {
            Err(RoutingError::UnknownNode { node })
        }
    }
}
