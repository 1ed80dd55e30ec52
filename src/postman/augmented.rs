//! Eulerized multigraph and circuit extraction.

use serde::Serialize;

use crate::error::{Result, RoutingError};
use crate::models::{RoadEdge, RoadGraph};

const NO_EDGE: usize = usize::MAX;

/// An edge of the augmented multigraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedEdge {
    /// First endpoint.
    pub u: usize,
    /// Second endpoint.
    pub v: usize,
    /// Length, copied from the road edge.
    pub length: f64,
    /// Id of the road edge this copy was made from.
    pub road_edge: usize,
    /// `true` for copies added while balancing odd vertices.
    pub duplicate: bool,
}

/// The road graph plus duplicated edges along matched shortest paths.
///
/// Edges are never contracted: an intermediate node shared by two matched
/// paths receives two extra edge ends per path and stays balanced.
#[derive(Debug, Clone, Serialize)]
pub struct AugmentedGraph {
    edges: Vec<AugmentedEdge>,
    #[serde(skip)]
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl AugmentedGraph {
    /// Copies every edge of `graph` once.
    pub fn from_graph(graph: &RoadGraph) -> Self {
        let mut aug = Self {
            edges: Vec::with_capacity(graph.num_edges()),
            adjacency: vec![Vec::new(); graph.num_nodes()],
        };
        for edge in graph.edges() {
            aug.push(edge, false);
        }
        aug
    }

    /// Adds one more copy of `edge`.
    pub fn duplicate(&mut self, edge: &RoadEdge) {
        self.push(edge, true);
    }

    fn push(&mut self, edge: &RoadEdge, duplicate: bool) {
        let idx = self.edges.len();
        let (u, v) = edge.endpoints();
        self.edges.push(AugmentedEdge {
            u,
            v,
            length: edge.length(),
            road_edge: edge.id(),
            duplicate,
        });
        self.adjacency[u].push((v, idx));
        self.adjacency[v].push((u, idx));
    }

    /// All edges, originals first, then duplicates in insertion order.
    pub fn edges(&self) -> &[AugmentedEdge] {
        &self.edges
    }

    /// Number of edges, counting duplicates.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edge ends at `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, |adj| adj.len())
    }

    /// Nodes of odd degree.
    pub fn odd_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes())
            .filter(|&v| self.degree(v) % 2 == 1)
            .collect()
    }

    /// Number of duplicated edges.
    pub fn num_duplicates(&self) -> usize {
        self.edges.iter().filter(|e| e.duplicate).count()
    }

    /// Sum of all edge lengths, duplicates included.
    pub fn total_length(&self) -> f64 {
        self.edges.iter().map(|e| e.length).sum()
    }

    /// Extracts a closed walk using every edge exactly once, from `start`.
    ///
    /// Uses Hierholzer's algorithm with an explicit stack. Returns the node
    /// sequence (first == last) and the edge indices in traversal order,
    /// where `edges[i]` joins `nodes[i]` and `nodes[i + 1]`.
    ///
    /// Fails with [`RoutingError::Unreachable`] if some edge lies outside the
    /// component of `start`. All degrees must be even.
    pub fn eulerian_circuit(&self, start: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        if start >= self.num_nodes() {
            return Err(RoutingError::UnknownNode { node: start });
        }
        debug_assert!(self.odd_nodes().is_empty(), "graph must be Eulerized");

        let mut used = vec![false; self.edges.len()];
        let mut cursor = vec![0usize; self.num_nodes()];
        let mut stack = vec![(start, NO_EDGE)];
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        let mut walk = Vec::with_capacity(self.edges.len());

        while let Some(&(node, via)) = stack.last() {
            let adj = &self.adjacency[node];
            while cursor[node] < adj.len() && used[adj[cursor[node]].1] {
                cursor[node] += 1;
            }
            if cursor[node] == adj.len() {
                stack.pop();
                nodes.push(node);
                if via != NO_EDGE {
                    walk.push(via);
                }
            } else {
                let (next, edge) = adj[cursor[node]];
                used[edge] = true;
                stack.push((next, edge));
            }
        }

        if let Some(missed) = used.iter().position(|&u| !u) {
            let e = &self.edges[missed];
            log::warn!(
                "edge ({}, {}) is not connected to start node {}",
                e.u,
                e.v,
                start
            );
            return Err(RoutingError::Unreachable {
                from: start,
                to: e.u,
            });
        }

        nodes.reverse();
        walk.reverse();
        Ok((nodes, walk))
    }
}
