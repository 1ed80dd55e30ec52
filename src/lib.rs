//! # u-arc-routing
//!
//! Arc routing library for snow-clearing fleets: Chinese Postman circuits
//! for a single unconstrained vehicle and capacitated tours (CARP) for a
//! fleet of time-limited plows.
//!
//! ## Modules
//!
//! - [`models`] — Road graph, configuration, tours, and solutions
//! - [`distance`] — All-pairs shortest path oracle
//! - [`postman`] — Chinese Postman solver (blossom matching, Hierholzer)
//! - [`constructive`] — Path-scanning construction heuristic
//! - [`local_search`] — Relocate and swap improvement
//! - [`carp`] — Capacitated arc routing entry point
//! - [`evaluation`] — Tour evaluation, solution statistics, fleet cost
//! - [`benchmark`] — Parallel comparison of scoring strategies
//! - [`error`] — Error type shared by all solvers

pub mod benchmark;
pub mod carp;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod postman;

pub use error::{Result, RoutingError};
