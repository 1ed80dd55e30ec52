//! Inter-tour edge swap operator.
//!
//! # Algorithm
//!
//! Exchanges one serviced edge of tour A with one of tour B in place,
//! keeping both positions. Accepts swaps that keep both tours within
//! capacity.
//!
//! # Complexity
//!
//! O(n_a · n_b · m) per tour pair.

use super::{Candidate, Move};
use crate::error::Result;
use crate::evaluation::TourEvaluator;
use crate::models::RoadEdge;

/// Best swap between tours `a` and `b`.
pub(crate) fn best_swap(
    tours: &[Vec<RoadEdge>],
    times: &[f64],
    a: usize,
    b: usize,
    evaluator: &TourEvaluator<'_>,
) -> Result<Option<Candidate>> {
    let mut best: Option<Candidate> = None;
    let old = times[a] + times[b];

    for pos_a in 0..tours[a].len() {
        for pos_b in 0..tours[b].len() {
            let mut new_a = tours[a].clone();
            let mut new_b = tours[b].clone();
            std::mem::swap(&mut new_a[pos_a], &mut new_b[pos_b]);

            let time_a = evaluator.tour_time(&new_a)?;
            if !evaluator.fits(time_a) {
                continue;
            }
            let time_b = evaluator.tour_time(&new_b)?;
            if !evaluator.fits(time_b) {
                continue;
            }

            let delta = time_a + time_b - old;
            if delta < -1e-9 && best.as_ref().is_none_or(|c| delta < c.delta) {
                best = Some(Candidate {
                    mv: Move::Swap {
                        tour_a: a,
                        pos_a,
                        tour_b: b,
                        pos_b,
                    },
                    delta,
                    times: (time_a, time_b),
                });
            }
        }
    }

    Ok(best)
}

/// Exchanges `tours[a][pos_a]` and `tours[b][pos_b]`.
pub(crate) fn apply_swap(tours: &mut [Vec<RoadEdge>], a: usize, pos_a: usize, b: usize, pos_b: usize) {
    let tmp = tours[a][pos_a].clone();
    tours[a][pos_a] = tours[b][pos_b].clone();
    tours[b][pos_b] = tmp;
}
