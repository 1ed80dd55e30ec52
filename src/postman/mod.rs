//! Chinese Postman solver: shortest closed walk covering every street.
//!
//! - [`matching`] — exact minimum-weight perfect matching (blossom algorithm)
//! - [`augmented`] — Eulerized multigraph and Hierholzer circuit
//! - [`solver`] — the full pipeline

pub mod augmented;
pub mod matching;
pub mod solver;

pub use augmented::{AugmentedEdge, AugmentedGraph};
pub use matching::min_weight_perfect_matching;
pub use solver::{chinese_postman, solve_chinese_postman, PostmanRoute};
