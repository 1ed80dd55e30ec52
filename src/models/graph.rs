//! Road network graph: nodes, undirected street edges, and arc collapse.

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// An intersection (or dead end) in the road network.
///
/// Nodes are identified by their dense index `0..num_nodes`. The optional
/// position is carried for renderers and never used by the solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    position: Option<(f64, f64)>,
}

impl Node {
    /// Node id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Planar position, if known.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }
}

/// An undirected street segment between two nodes.
///
/// Lengths are in metres. `required` marks streets that must be serviced
/// by the capacitated fleet.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::RoadGraph;
///
/// let mut g = RoadGraph::new(2);
/// let id = g.add_edge(0, 1, 1500.0, true).unwrap();
/// let e = g.edge(id).unwrap();
/// assert_eq!(e.other(0), Some(1));
/// assert!((e.length_km() - 1.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadEdge {
    id: usize,
    u: usize,
    v: usize,
    length: f64,
    required: bool,
}

impl RoadEdge {
    /// Stable edge id (insertion order of the first arc on this pair).
    pub fn id(&self) -> usize {
        self.id
    }

    /// First endpoint (the smaller node id).
    pub fn u(&self) -> usize {
        self.u
    }

    /// Second endpoint (the larger node id).
    pub fn v(&self) -> usize {
        self.v
    }

    /// Both endpoints as `(u, v)`.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    /// Length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Length in kilometres.
    pub fn length_km(&self) -> f64 {
        self.length / 1000.0
    }

    /// Returns `true` if this street must be serviced.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the endpoint opposite to `node`, or `None` if `node` is not
    /// an endpoint of this edge.
    pub fn other(&self, node: usize) -> Option<usize> {
        if node == self.u {
            Some(self.v)
        } else if node == self.v {
            Some(self.u)
        } else {
            None
        }
    }
}

/// Simple undirected road graph.
///
/// The street network is held in a petgraph [`UnGraph`] whose node indices
/// are the node ids and whose edge weights are the [`RoadEdge`] ids.
/// At most one edge exists per unordered node pair. Adding a second edge on
/// the same pair (a parallel street, or the opposite direction of a one-way
/// arc) keeps the minimum length and marks the edge required if either arc
/// was required.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::RoadGraph;
///
/// // Two opposite arcs collapse to one undirected edge of the shorter length.
/// let g = RoadGraph::from_arcs(3, [(0, 1, 120.0, false), (1, 0, 100.0, true), (1, 2, 50.0, false)])
///     .unwrap();
/// assert_eq!(g.num_edges(), 2);
/// let e = g.edge_between(1, 0).unwrap();
/// assert_eq!(e.length(), 100.0);
/// assert!(e.is_required());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: Vec<Node>,
    edges: Vec<RoadEdge>,
    network: UnGraph<(), usize>,
}

impl RoadGraph {
    /// Creates a graph with `num_nodes` nodes and no edges.
    pub fn new(num_nodes: usize) -> Self {
        let mut network = UnGraph::with_capacity(num_nodes, 0);
        for _ in 0..num_nodes {
            network.add_node(());
        }
        Self {
            nodes: (0..num_nodes)
                .map(|id| Node { id, position: None })
                .collect(),
            edges: Vec::new(),
            network,
        }
    }

    /// Builds a graph from directed arcs `(from, to, length_m, required)`,
    /// collapsing parallel and opposite arcs to one undirected edge.
    pub fn from_arcs<I>(num_nodes: usize, arcs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64, bool)>,
    {
        let mut graph = Self::new(num_nodes);
        for (from, to, length, required) in arcs {
            graph.add_arc(from, to, length, required)?;
        }
        Ok(graph)
    }

    /// Appends a node and returns its id.
    pub fn add_node(&mut self, position: Option<(f64, f64)>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { id, position });
        self.network.add_node(());
        id
    }

    /// Sets the planar position of a node.
    pub fn set_position(&mut self, node: usize, x: f64, y: f64) -> Result<()> {
        let n = self
            .nodes
            .get_mut(node)
            .ok_or(RoutingError::UnknownNode { node })?;
        n.position = Some((x, y));
        Ok(())
    }

    /// Adds an undirected edge of `length` metres and returns its id.
    ///
    /// If the pair is already connected, the existing edge keeps the smaller
    /// length and becomes required if `required` is set; its id is returned.
    /// Self-loops and negative or non-finite lengths are rejected.
    pub fn add_edge(&mut self, u: usize, v: usize, length: f64, required: bool) -> Result<usize> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v || !length.is_finite() || length < 0.0 {
            return Err(RoutingError::InvalidEdge { u, v, length });
        }

        let (a, b) = (u.min(v), u.max(v));
        if let Some(id) = self.edge_id_between(a, b) {
            let edge = &mut self.edges[id];
            if length < edge.length {
                edge.length = length;
            }
            edge.required |= required;
            return Ok(id);
        }

        let id = self.edges.len();
        self.edges.push(RoadEdge {
            id,
            u: a,
            v: b,
            length,
            required,
        });
        self.network.add_edge(NodeIndex::new(a), NodeIndex::new(b), id);
        Ok(id)
    }

    /// Adds a directed arc `from -> to`, collapsed into the undirected edge
    /// of its node pair. Returns the edge id.
    pub fn add_arc(&mut self, from: usize, to: usize, length: f64, required: bool) -> Result<usize> {
        self.add_edge(from, to, length, required)
    }

    /// Sets the `required` flag of an existing edge.
    pub fn set_required(&mut self, edge: usize, required: bool) -> Option<()> {
        self.edges.get_mut(edge).map(|e| e.required = required)
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node by id.
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All edges in id order.
    pub fn edges(&self) -> &[RoadEdge] {
        &self.edges
    }

    /// Edge by id.
    pub fn edge(&self, id: usize) -> Option<&RoadEdge> {
        self.edges.get(id)
    }

    /// The edge joining `a` and `b`, in either order.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&RoadEdge> {
        self.edge_id_between(a, b).map(|id| &self.edges[id])
    }

    /// Neighbors of `node` as `(neighbor, edge_id)` pairs, sorted by
    /// neighbor id.
    ///
    /// Returns an empty list for unknown nodes.
    pub fn neighbors(&self, node: usize) -> Vec<(usize, usize)> {
        if node >= self.nodes.len() {
            return Vec::new();
        }
        let mut adj: Vec<(usize, usize)> = self
            .network
            .edges(NodeIndex::new(node))
            .filter_map(|e| {
                let id = *e.weight();
                self.edges[id].other(node).map(|next| (next, id))
            })
            .collect();
        adj.sort_unstable();
        adj
    }

    /// Number of edges incident to `node`.
    pub fn degree(&self, node: usize) -> usize {
        if node >= self.nodes.len() {
            return 0;
        }
        self.network.edges(NodeIndex::new(node)).count()
    }

    /// Iterates over the required edges in id order.
    pub fn required_edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.edges.iter().filter(|e| e.required)
    }

    /// Sum of all edge lengths in metres.
    pub fn total_length(&self) -> f64 {
        self.edges.iter().map(|e| e.length).sum()
    }

    /// Sum of required edge lengths in metres.
    pub fn required_length(&self) -> f64 {
        self.required_edges().map(|e| e.length).sum()
    }

    /// The petgraph view of the street network.
    pub(crate) fn network(&self) -> &UnGraph<(), usize> {
        &self.network
    }

    fn edge_id_between(&self, a: usize, b: usize) -> Option<usize> {
        if a >= self.nodes.len() || b >= self.nodes.len() {
            return None;
        }
        self.network
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| self.network[e])
    }

    pub(crate) fn check_node(&self, node: usize) -> Result<()> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(RoutingError::UnknownNode { node })
        }
    }
}
