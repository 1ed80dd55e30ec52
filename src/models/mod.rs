//! Domain model types for arc routing problems.
//!
//! Provides the road network (nodes and undirected street edges), solver
//! configuration values, tours as ordered sequences of serviced streets,
//! and the CARP solution that collects them.

mod config;
mod graph;
mod solution;
mod tour;

pub use config::{CarpConfig, PostmanConfig, Strategy};
pub use graph::{Node, RoadEdge, RoadGraph};
pub use solution::Solution;
pub use tour::{ServicedEdge, Tour};
