//! Chinese Postman (undirected route inspection) solver.
//!
//! # Algorithm
//!
//! 1. Collect the odd-degree nodes of the (already collapsed) road graph.
//! 2. Pair them by an exact minimum-weight perfect matching on shortest
//!    path distances.
//! 3. Duplicate every edge on each matched shortest path.
//! 4. Walk the resulting Eulerian multigraph with Hierholzer's algorithm.
//!
//! The walk length equals the sum of all edge lengths plus the matching
//! weight, which is the minimum length of any closed walk covering every
//! edge at least once.
//!
//! # Complexity
//!
//! O(V · E log V) for the distance table, O(k³) for the matching on k odd
//! nodes, O(E) for the circuit.
//!
//! # Reference
//!
//! Edmonds, J. & Johnson, E. L. (1973). "Matching, Euler tours and the
//! Chinese postman", *Mathematical Programming* 5, 88-124.

use serde::Serialize;

use super::augmented::{AugmentedEdge, AugmentedGraph};
use super::matching::min_weight_perfect_matching;
use crate::distance::ShortestPaths;
use crate::error::{Result, RoutingError};
use crate::models::{PostmanConfig, RoadGraph};

/// A closed walk covering every street at least once.
#[derive(Debug, Clone, Serialize)]
pub struct PostmanRoute {
    nodes: Vec<usize>,
    edge_sequence: Vec<usize>,
    augmented: AugmentedGraph,
    base_distance: f64,
    matching_distance: f64,
    matched_pairs: Vec<(usize, usize)>,
}

impl PostmanRoute {
    /// Node sequence of the walk; the first and last nodes coincide.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Indices into [`augmented`](Self::augmented) edges in walk order.
    pub fn edge_sequence(&self) -> &[usize] {
        &self.edge_sequence
    }

    /// Traversed edges in walk order.
    pub fn edges(&self) -> impl Iterator<Item = &AugmentedEdge> {
        self.edge_sequence
            .iter()
            .map(move |&i| &self.augmented.edges()[i])
    }

    /// The Eulerized multigraph the walk was extracted from.
    pub fn augmented(&self) -> &AugmentedGraph {
        &self.augmented
    }

    /// Start and end node.
    pub fn start(&self) -> usize {
        self.nodes[0]
    }

    /// Total walk length: every street once plus the matched detours.
    pub fn total_distance(&self) -> f64 {
        self.base_distance + self.matching_distance
    }

    /// Sum of all street lengths.
    pub fn base_distance(&self) -> f64 {
        self.base_distance
    }

    /// Weight of the odd-node matching (length driven twice).
    pub fn matching_distance(&self) -> f64 {
        self.matching_distance
    }

    /// Odd-node pairs joined by duplicated paths.
    pub fn matched_pairs(&self) -> &[(usize, usize)] {
        &self.matched_pairs
    }

    /// Number of edges traversed a second time.
    pub fn num_duplicated(&self) -> usize {
        self.augmented.num_duplicates()
    }
}

/// Solves the Chinese Postman problem on `graph`.
///
/// The walk starts at the configured depot or, by default, at the lowest
/// node that has an edge. An edgeless graph yields the single start node
/// with distance 0.
///
/// # Errors
///
/// - [`RoutingError::EmptyGraph`] if the graph has no nodes
/// - [`RoutingError::UnknownNode`] for a depot outside the graph
/// - [`RoutingError::DegenerateMatching`] if odd nodes cannot be paired
/// - [`RoutingError::Unreachable`] if the streets do not form one connected
///   piece containing the start node
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{RoadGraph, PostmanConfig};
/// use u_arc_routing::distance::ShortestPaths;
/// use u_arc_routing::postman::solve_chinese_postman;
///
/// // Path 0-1-2: both ends are odd, the whole path is driven twice.
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 100.0, false).unwrap();
/// g.add_edge(1, 2, 50.0, false).unwrap();
/// let sp = ShortestPaths::new(&g);
///
/// let route = solve_chinese_postman(&g, &sp, &PostmanConfig::default()).unwrap();
/// assert_eq!(route.total_distance(), 300.0);
/// assert_eq!(route.nodes().first(), route.nodes().last());
/// ```
pub fn solve_chinese_postman(
    graph: &RoadGraph,
    oracle: &ShortestPaths,
    config: &PostmanConfig,
) -> Result<PostmanRoute> {
    if graph.num_nodes() == 0 {
        return Err(RoutingError::EmptyGraph);
    }
    if oracle.size() != graph.num_nodes() {
        return Err(RoutingError::InvalidConfig(format!(
            "shortest path table covers {} nodes but the graph has {}",
            oracle.size(),
            graph.num_nodes()
        )));
    }

    let start = match config.depot() {
        Some(depot) => {
            graph.check_node(depot)?;
            depot
        }
        None => (0..graph.num_nodes())
            .find(|&v| graph.degree(v) > 0)
            .unwrap_or(0),
    };

    let mut augmented = AugmentedGraph::from_graph(graph);
    let odd = augmented.odd_nodes();
    log::debug!(
        "postman: {} nodes, {} edges, {} odd nodes",
        graph.num_nodes(),
        graph.num_edges(),
        odd.len()
    );

    let mut matching_distance = 0.0;
    let mut matched_pairs = Vec::with_capacity(odd.len() / 2);

    if !odd.is_empty() {
        let mut aux = Vec::with_capacity(odd.len() * (odd.len() - 1) / 2);
        for i in 0..odd.len() {
            for j in (i + 1)..odd.len() {
                let d = oracle.raw_distance(odd[i], odd[j]);
                if d.is_finite() {
                    aux.push((i, j, d));
                }
            }
        }

        let pairs = min_weight_perfect_matching(odd.len(), &aux).map_err(|err| match err {
            RoutingError::DegenerateMatching { unmatched } => RoutingError::DegenerateMatching {
                unmatched: unmatched.into_iter().map(|i| odd[i]).collect(),
            },
            other => other,
        })?;

        for (i, j) in pairs {
            let (a, b) = (odd[i], odd[j]);
            matching_distance += oracle.distance(a, b)?;
            let path = oracle.path(a, b)?;
            for hop in path.windows(2) {
                let edge = graph
                    .edge_between(hop[0], hop[1])
                    .ok_or(RoutingError::Unreachable {
                        from: hop[0],
                        to: hop[1],
                    })?;
                augmented.duplicate(edge);
            }
            matched_pairs.push((a, b));
        }
        log::debug!(
            "postman: matched {} pairs, detour {:.3}, {} duplicated edges",
            matched_pairs.len(),
            matching_distance,
            augmented.num_duplicates()
        );
    }

    let (nodes, edge_sequence) = augmented.eulerian_circuit(start)?;

    Ok(PostmanRoute {
        nodes,
        edge_sequence,
        augmented,
        base_distance: graph.total_length(),
        matching_distance,
        matched_pairs,
    })
}

/// Builds the shortest path table and solves the Chinese Postman problem.
pub fn chinese_postman(graph: &RoadGraph, config: &PostmanConfig) -> Result<PostmanRoute> {
    let oracle = ShortestPaths::new(graph);
    solve_chinese_postman(graph, &oracle, config)
}
