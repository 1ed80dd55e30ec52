//! Distance matrices and the all-pairs shortest path oracle.
//!
//! - [`DistanceMatrix`] — dense n×n storage
//! - [`ShortestPaths`] — Dijkstra from every node over a [`RoadGraph`](crate::models::RoadGraph)

mod matrix;
mod shortest_paths;

pub use matrix::DistanceMatrix;
pub use shortest_paths::ShortestPaths;
