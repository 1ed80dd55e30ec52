//! Constructive heuristics for building initial CARP solutions.
//!
//! - [`path_scanning`] — Greedy path scanning with pluggable scoring (Golden et al., 1983), O(R²)

mod path_scanning;

pub use path_scanning::path_scanning;
