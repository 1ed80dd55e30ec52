//! Expansion of a tour into the full node walk driven by the vehicle.

use crate::distance::ShortestPaths;
use crate::error::Result;
use crate::models::Tour;

/// Node walk depot → … → depot of `tour`, with the shortest-path deadhead
/// segments between serviced edges filled in.
///
/// Consecutive entries are always joined by a street. An empty tour expands
/// to `[depot]`.
pub fn expand_tour(tour: &Tour, oracle: &ShortestPaths) -> Result<Vec<usize>> {
    let depot = tour.depot();
    let mut walk = vec![depot];
    let mut position = depot;

    for step in tour.edges() {
        extend_path(&mut walk, oracle, position, step.from)?;
        walk.push(step.to);
        position = step.to;
    }
    extend_path(&mut walk, oracle, position, depot)?;
    Ok(walk)
}

fn extend_path(walk: &mut Vec<usize>, oracle: &ShortestPaths, from: usize, to: usize) -> Result<()> {
    if from != to {
        let path = oracle.path(from, to)?;
        walk.extend_from_slice(&path[1..]);
    }
    Ok(())
}
