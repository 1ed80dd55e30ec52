//! Error type shared by graph construction and the route solvers.

use std::fmt;
use std::time::Duration;

/// Errors raised while building a road graph or solving a routing problem.
///
/// Every variant identifies the offending node, edge, or limit so that a
/// failed solve can be traced back to its input.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// A node id outside `0..num_nodes` was referenced.
    UnknownNode {
        /// The offending node id.
        node: usize,
    },
    /// An edge is a self-loop or has a negative or non-finite length.
    InvalidEdge {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Supplied length.
        length: f64,
    },
    /// The graph has no nodes, so no route can start anywhere.
    EmptyGraph,
    /// No path connects the two nodes.
    Unreachable {
        /// Source node.
        from: usize,
        /// Target node.
        to: usize,
    },
    /// A required edge can never fit into a single tour.
    CapacityViolation {
        /// Edge id.
        edge: usize,
        /// First endpoint of the edge.
        u: usize,
        /// Second endpoint of the edge.
        v: usize,
        /// Hours the edge needs (service alone, or access + service + return).
        required_hours: f64,
        /// Per-tour time budget.
        capacity_hours: f64,
    },
    /// The odd-degree vertices admit no perfect matching.
    DegenerateMatching {
        /// Vertices left without a partner.
        unmatched: Vec<usize>,
    },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// The solve ran past its configured time limit.
    DeadlineExceeded {
        /// Time spent when the limit was detected.
        elapsed: Duration,
    },
    /// The fleet cost exceeds the allowed budget.
    BudgetExceeded {
        /// Computed total cost.
        total: f64,
        /// Budget cap.
        budget: f64,
    },
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::UnknownNode { node } => write!(f, "unknown node {}", node),
            RoutingError::InvalidEdge { u, v, length } => {
                write!(f, "invalid edge ({}, {}) with length {}", u, v, length)
            }
            RoutingError::EmptyGraph => write!(f, "graph has no nodes"),
            RoutingError::Unreachable { from, to } => {
                write!(f, "node {} is unreachable from node {}", to, from)
            }
            RoutingError::CapacityViolation {
                edge,
                u,
                v,
                required_hours,
                capacity_hours,
            } => write!(
                f,
                "edge {} ({}, {}) needs {:.3} h which exceeds the tour capacity of {:.3} h",
                edge, u, v, required_hours, capacity_hours
            ),
            RoutingError::DegenerateMatching { unmatched } => write!(
                f,
                "no perfect matching exists, {} odd vertices left unmatched: {:?}",
                unmatched.len(),
                unmatched
            ),
            RoutingError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            RoutingError::DeadlineExceeded { elapsed } => {
                write!(f, "time limit exceeded after {:.3} s", elapsed.as_secs_f64())
            }
            RoutingError::BudgetExceeded { total, budget } => {
                write!(f, "fleet cost {:.2} exceeds budget {:.2}", total, budget)
            }
        }
    }
}

impl std::error::Error for RoutingError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_capacity_violation() {
        let err = RoutingError::CapacityViolation {
            edge: 3,
            u: 1,
            v: 2,
            required_hours: 10.0,
            capacity_hours: 8.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("edge 3"));
        assert!(msg.contains("(1, 2)"));
        assert!(msg.contains("10.000"));
    }

    #[test]
    fn test_display_unreachable() {
        let err = RoutingError::Unreachable { from: 0, to: 7 };
        assert_eq!(err.to_string(), "node 7 is unreachable from node 0");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&RoutingError::EmptyGraph);
    }
}
