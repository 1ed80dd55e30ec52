//! Side-by-side comparison of scoring strategies.
//!
//! Each strategy is solved on its own rayon task. The graph and the shortest
//! path table are shared read-only; every run owns its tours.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::carp::solve_carp;
use crate::distance::ShortestPaths;
use crate::error::Result;
use crate::evaluation::{analyze_solution_quality, SolutionQuality};
use crate::models::{CarpConfig, RoadGraph, Strategy};

/// Outcome of one strategy run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkEntry {
    /// Strategy that was run.
    pub strategy: Strategy,
    /// Statistics of the resulting solution.
    pub quality: SolutionQuality,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
}

/// Solves the same instance once per strategy, in parallel.
///
/// All runs share `config` apart from the strategy. Entries come back in
/// the order of `strategies`; the first failing run aborts the benchmark.
///
/// # Examples
///
/// ```
/// use u_arc_routing::benchmark::benchmark_strategies;
/// use u_arc_routing::models::{CarpConfig, RoadGraph, Strategy};
/// use u_arc_routing::distance::ShortestPaths;
///
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 1000.0, true).unwrap();
/// g.add_edge(1, 2, 1000.0, true).unwrap();
/// let sp = ShortestPaths::new(&g);
///
/// let entries = benchmark_strategies(&g, &sp, &CarpConfig::default(), &Strategy::ALL).unwrap();
/// assert_eq!(entries.len(), 4);
/// assert_eq!(entries[0].strategy, Strategy::Nearest);
/// ```
pub fn benchmark_strategies(
    graph: &RoadGraph,
    oracle: &ShortestPaths,
    config: &CarpConfig,
    strategies: &[Strategy],
) -> Result<Vec<BenchmarkEntry>> {
    strategies
        .par_iter()
        .map(|&strategy| {
            let run_config = config.clone().with_strategy(strategy);
            let started = Instant::now();
            let solution = solve_carp(graph, oracle, &run_config)?;
            let elapsed = started.elapsed();
            log::debug!(
                "benchmark {}: {} tours in {:?}",
                strategy,
                solution.num_tours(),
                elapsed
            );
            Ok(BenchmarkEntry {
                strategy,
                quality: analyze_solution_quality(&solution),
                elapsed,
            })
        })
        .collect()
}
