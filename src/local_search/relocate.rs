//! Inter-tour edge relocation operator.
//!
//! # Algorithm
//!
//! Tries moving each serviced edge from its tour to every position of
//! another tour, re-evaluating both tours with greedy entry orientation.
//! Only moves that keep both tours within capacity are kept.
//!
//! # Complexity
//!
//! O(n² · m) evaluations per tour pair, where n = edges per tour and the
//! tour evaluation itself is O(m).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{Candidate, Move};
use crate::error::Result;
use crate::evaluation::TourEvaluator;
use crate::models::RoadEdge;

/// Best relocation of one edge from tour `from` into tour `to`.
///
/// `times` holds the current time of every tour. Returns the improving
/// candidate with the most negative delta, if any.
pub(crate) fn best_relocate(
    tours: &[Vec<RoadEdge>],
    times: &[f64],
    from: usize,
    to: usize,
    evaluator: &TourEvaluator<'_>,
) -> Result<Option<Candidate>> {
    let mut best: Option<Candidate> = None;
    let old = times[from] + times[to];

    for from_pos in 0..tours[from].len() {
        let mut shrunk = tours[from].clone();
        let edge = shrunk.remove(from_pos);
        let time_from = evaluator.tour_time(&shrunk)?;
        if !evaluator.fits(time_from) {
            continue;
        }

        for to_pos in 0..=tours[to].len() {
            let mut grown = tours[to].clone();
            grown.insert(to_pos, edge.clone());
            let time_to = evaluator.tour_time(&grown)?;
            if !evaluator.fits(time_to) {
                continue;
            }

            let delta = time_from + time_to - old;
            if delta < -1e-9 && best.as_ref().is_none_or(|b| delta < b.delta) {
                best = Some(Candidate {
                    mv: Move::Relocate {
                        from_tour: from,
                        from_pos,
                        to_tour: to,
                        to_pos,
                    },
                    delta,
                    times: (time_from, time_to),
                });
            }
        }
    }

    Ok(best)
}

/// Moves the edge at `from_pos` of tour `from` to `to_pos` of tour `to`.
pub(crate) fn apply_relocate(
    tours: &mut [Vec<RoadEdge>],
    from: usize,
    from_pos: usize,
    to: usize,
    to_pos: usize,
) {
    let edge = tours[from].remove(from_pos);
    tours[to].insert(to_pos, edge);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ShortestPaths;
    use crate::models::{CarpConfig, RoadGraph};

    /// Depot 0 with spokes to 1 and 2; edge (1, 3) hangs off node 1.
    fn spokes() -> RoadGraph {
        let mut g = RoadGraph::new(4);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        g.add_edge(0, 2, 5000.0, true).expect("valid");
        g.add_edge(1, 3, 1000.0, true).expect("valid");
        g
    }

    #[test]
    fn test_relocate_joins_neighbouring_edges() {
        let g = spokes();
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default();
        let ev = TourEvaluator::new(&sp, &config);

        // (1, 3) is serviced in the far tour: moving it next to (0, 1) saves
        // the double trip over (0, 1).
        let tours = vec![
            vec![g.edges()[0].clone()],
            vec![g.edges()[1].clone(), g.edges()[2].clone()],
        ];
        let times: Vec<f64> = tours
            .iter()
            .map(|t| ev.tour_time(t).expect("valid"))
            .collect();

        let best = best_relocate(&tours, &times, 1, 0, &ev)
            .expect("valid")
            .expect("improving move");
        assert!(matches!(
            best.mv,
            Move::Relocate {
                from_tour: 1,
                from_pos: 1,
                to_tour: 0,
                ..
            }
        ));
        assert!(best.delta < 0.0);

        let mut applied = tours.clone();
        if let Move::Relocate {
            from_tour,
            from_pos,
            to_tour,
            to_pos,
        } = best.mv
        {
            apply_relocate(&mut applied, from_tour, from_pos, to_tour, to_pos);
        }
        let after: f64 = applied.iter().map(|t| ev.tour_time(t).expect("valid")).sum();
        let before: f64 = times.iter().sum();
        assert!((after - (before + best.delta)).abs() < 1e-10);
        assert_eq!(applied[0].len(), 2);
        assert_eq!(applied[1].len(), 1);
    }

    #[test]
    fn test_relocate_respects_capacity() {
        let g = spokes();
        let sp = ShortestPaths::new(&g);
        // Tour 0 takes 0.2 h and grows to at least 0.4 h with any extra edge.
        let config = CarpConfig::default().with_capacity_hours(0.3);
        let ev = TourEvaluator::new(&sp, &config);
        let tours = vec![
            vec![g.edges()[0].clone()],
            vec![g.edges()[1].clone(), g.edges()[2].clone()],
        ];
        let times: Vec<f64> = tours
            .iter()
            .map(|t| ev.tour_time(t).expect("valid"))
            .collect();
        assert!(best_relocate(&tours, &times, 1, 0, &ev)
            .expect("valid")
            .is_none());
    }
}
