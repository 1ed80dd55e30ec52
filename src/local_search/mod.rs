//! Local search over CARP tours.
//!
//! - [`relocate`] — Move one serviced edge into another tour
//! - [`swap`] — Exchange serviced edges between two tours
//!
//! [`improve_tours`] runs best-improvement search over both neighborhoods:
//! every iteration scans all tour pairs, applies the single move with the
//! largest time saving, and stops when no move saves more than 1e-9 h.

mod relocate;
mod swap;

use serde::Serialize;

use crate::error::Result;
use crate::evaluation::TourEvaluator;
use crate::models::{RoadEdge, Tour};

/// A neighborhood move between two tours.
///
/// Tour indices and positions refer to the tour list at the time the move
/// was applied, before emptied tours are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Edge at `from_pos` of `from_tour` inserted at `to_pos` of `to_tour`.
    Relocate {
        from_tour: usize,
        from_pos: usize,
        to_tour: usize,
        to_pos: usize,
    },
    /// Edges at `pos_a` of `tour_a` and `pos_b` of `tour_b` exchanged.
    Swap {
        tour_a: usize,
        pos_a: usize,
        tour_b: usize,
        pos_b: usize,
    },
}

/// What the improvement pass did.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImprovementReport {
    /// Applied moves, in order.
    pub moves: Vec<Move>,
    /// Neighborhood scans performed.
    pub iterations: usize,
    /// Total time saved in hours.
    pub time_saved_hours: f64,
}

/// An improving move and the resulting times of the two tours it touches.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) mv: Move,
    pub(crate) delta: f64,
    pub(crate) times: (f64, f64),
}

/// Ordered pairs `(a, b)` with `a != b` over `n` tours.
pub fn tour_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n.saturating_sub(1) * n);
    for a in 0..n {
        for b in 0..n {
            if a != b {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Improves `tours` by relocate and swap moves, for at most
/// `max_iterations` scans.
///
/// Moves are applied only if they reduce total time and keep both tours
/// within capacity. Emptied tours are dropped and the rest renumbered.
///
/// # Examples
///
/// ```
/// use u_arc_routing::models::{CarpConfig, RoadGraph};
/// use u_arc_routing::distance::ShortestPaths;
/// use u_arc_routing::evaluation::TourEvaluator;
/// use u_arc_routing::local_search::improve_tours;
///
/// let mut g = RoadGraph::new(3);
/// g.add_edge(0, 1, 1000.0, true).unwrap();
/// g.add_edge(1, 2, 1000.0, true).unwrap();
/// let sp = ShortestPaths::new(&g);
/// let config = CarpConfig::default();
/// let ev = TourEvaluator::new(&sp, &config);
///
/// // One tour per edge: merging them saves the second trip over (0, 1).
/// let tours = vec![
///     ev.build_tour(0, &g.edges()[..1]).unwrap(),
///     ev.build_tour(1, &g.edges()[1..]).unwrap(),
/// ];
/// let (improved, report) = improve_tours(&tours, &ev, 100).unwrap();
/// assert_eq!(improved.len(), 1);
/// assert_eq!(report.moves.len(), 1);
/// ```
pub fn improve_tours(
    tours: &[Tour],
    evaluator: &TourEvaluator<'_>,
    max_iterations: usize,
) -> Result<(Vec<Tour>, ImprovementReport)> {
    let mut sequences: Vec<Vec<RoadEdge>> = tours
        .iter()
        .map(|t| t.edges().iter().map(|s| s.edge.clone()).collect())
        .collect();
    let mut times = sequences
        .iter()
        .map(|s| evaluator.tour_time(s))
        .collect::<Result<Vec<f64>>>()?;
    let mut report = ImprovementReport::default();

    if sequences.len() >= 2 {
        let pairs = tour_pairs(sequences.len());
        while report.iterations < max_iterations {
            report.iterations += 1;
            let Some(best) = best_move(&sequences, &times, &pairs, evaluator)? else {
                break;
            };

            let (a, b) = match best.mv {
                Move::Relocate {
                    from_tour,
                    from_pos,
                    to_tour,
                    to_pos,
                } => {
                    relocate::apply_relocate(&mut sequences, from_tour, from_pos, to_tour, to_pos);
                    (from_tour, to_tour)
                }
                Move::Swap {
                    tour_a,
                    pos_a,
                    tour_b,
                    pos_b,
                } => {
                    swap::apply_swap(&mut sequences, tour_a, pos_a, tour_b, pos_b);
                    (tour_a, tour_b)
                }
            };
            times[a] = best.times.0;
            times[b] = best.times.1;
            report.time_saved_hours -= best.delta;
            log::trace!("applied {:?}, delta {:.6} h", best.mv, best.delta);
            report.moves.push(best.mv);
        }
    }

    log::debug!(
        "local search: {} moves in {} iterations, saved {:.4} h",
        report.moves.len(),
        report.iterations,
        report.time_saved_hours
    );

    let improved = sequences
        .iter()
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(id, s)| evaluator.build_tour(id, s))
        .collect::<Result<Vec<Tour>>>()?;
    Ok((improved, report))
}

fn best_move(
    sequences: &[Vec<RoadEdge>],
    times: &[f64],
    pairs: &[(usize, usize)],
    evaluator: &TourEvaluator<'_>,
) -> Result<Option<Candidate>> {
    let mut best: Option<Candidate> = None;
    for &(a, b) in pairs {
        let relocation = relocate::best_relocate(sequences, times, a, b, evaluator)?;
        let exchange = if a < b {
            swap::best_swap(sequences, times, a, b, evaluator)?
        } else {
            None
        };
        for candidate in [relocation, exchange].into_iter().flatten() {
            if best.as_ref().is_none_or(|c| candidate.delta < c.delta) {
                best = Some(candidate);
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ShortestPaths;
    use crate::models::{CarpConfig, RoadGraph};
    use proptest::prelude::*;

    #[test]
    fn test_tour_pairs() {
        assert!(tour_pairs(1).is_empty());
        assert_eq!(tour_pairs(2), vec![(0, 1), (1, 0)]);
        assert_eq!(tour_pairs(3).len(), 6);
    }

    #[test]
    fn test_single_tour_untouched() {
        let mut g = RoadGraph::new(2);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default();
        let ev = TourEvaluator::new(&sp, &config);
        let tours = vec![ev.build_tour(0, g.edges()).expect("valid")];
        let (improved, report) = improve_tours(&tours, &ev, 100).expect("valid");
        assert_eq!(improved, tours);
        assert!(report.moves.is_empty());
        assert_eq!(report.iterations, 0);
    }

    #[test]
    fn test_merge_drops_empty_tour_and_renumbers() {
        let mut g = RoadGraph::new(4);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        g.add_edge(1, 2, 1000.0, true).expect("valid");
        g.add_edge(2, 3, 1000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default();
        let ev = TourEvaluator::new(&sp, &config);
        let e = g.edges();
        let tours = vec![
            ev.build_tour(0, &e[..1]).expect("valid"),
            ev.build_tour(1, &e[1..2]).expect("valid"),
            ev.build_tour(2, &e[2..]).expect("valid"),
        ];
        let before: f64 = tours.iter().map(|t| t.time_hours()).sum();
        let (improved, report) = improve_tours(&tours, &ev, 100).expect("valid");
        let after: f64 = improved.iter().map(|t| t.time_hours()).sum();

        assert_eq!(improved.len(), 1);
        assert_eq!(improved[0].id(), 0);
        assert_eq!(improved[0].len(), 3);
        assert!((before - after - report.time_saved_hours).abs() < 1e-9);
        // 3 km out, 3 km back
        assert!((after - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_iteration_cap() {
        let mut g = RoadGraph::new(4);
        g.add_edge(0, 1, 1000.0, true).expect("valid");
        g.add_edge(1, 2, 1000.0, true).expect("valid");
        g.add_edge(2, 3, 1000.0, true).expect("valid");
        let sp = ShortestPaths::new(&g);
        let config = CarpConfig::default();
        let ev = TourEvaluator::new(&sp, &config);
        let tours: Vec<Tour> = g
            .edges()
            .iter()
            .enumerate()
            .map(|(i, e)| ev.build_tour(i, std::slice::from_ref(e)).expect("valid"))
            .collect();
        let (improved, report) = improve_tours(&tours, &ev, 1).expect("valid");
        assert_eq!(report.iterations, 1);
        assert_eq!(report.moves.len(), 1);
        assert_eq!(improved.len(), 2);
    }

    #[test]
    fn test_report_serializes_moves() {
        let report = ImprovementReport {
            moves: vec![Move::Swap {
                tour_a: 0,
                pos_a: 1,
                tour_b: 2,
                pos_b: 0,
            }],
            iterations: 2,
            time_saved_hours: 0.5,
        };
        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["moves"][0]["kind"], "swap");
        assert_eq!(json["moves"][0]["tour_b"], 2);
    }

    fn star_graph(lengths: &[f64]) -> RoadGraph {
        // Spokes 0-i plus a rim i-(i+1), all required.
        let n = lengths.len();
        let mut g = RoadGraph::new(n + 1);
        for (i, &len) in lengths.iter().enumerate() {
            g.add_edge(0, i + 1, len, true).expect("valid");
            if i + 1 < n {
                g.add_edge(i + 1, i + 2, len / 2.0 + 100.0, true).expect("valid");
            }
        }
        g
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn prop_never_worse_and_keeps_edges(
            lengths in proptest::collection::vec(100.0f64..3000.0, 2..6),
        ) {
            let g = star_graph(&lengths);
            let sp = ShortestPaths::new(&g);
            let config = CarpConfig::default().with_capacity_hours(2.0);
            let ev = TourEvaluator::new(&sp, &config);
            let tours: Vec<Tour> = g
                .edges()
                .iter()
                .enumerate()
                .map(|(i, e)| ev.build_tour(i, std::slice::from_ref(e)).expect("valid"))
                .collect();
            let before: f64 = tours.iter().map(|t| t.time_hours()).sum();

            let (improved, report) = improve_tours(&tours, &ev, 100).expect("valid");
            let after: f64 = improved.iter().map(|t| t.time_hours()).sum();
            prop_assert!(after <= before + 1e-9);
            prop_assert!((before - after - report.time_saved_hours).abs() < 1e-6);
            prop_assert!(report.iterations <= 100);

            let mut ids: Vec<usize> = improved.iter().flat_map(|t| t.edge_ids()).collect();
            ids.sort_unstable();
            prop_assert_eq!(ids, (0..g.num_edges()).collect::<Vec<_>>());
            for (i, t) in improved.iter().enumerate() {
                prop_assert_eq!(t.id(), i);
                prop_assert!(!t.is_empty());
                prop_assert!(t.time_hours() <= 2.0 + 1e-9);
            }
        }
    }
}
