//! Exact minimum-weight perfect matching on general graphs.
//!
//! # Algorithm
//!
//! Edmonds' weighted blossom algorithm in the primal-dual form of Galil
//! (1986): grow alternating trees from free vertices, shrink odd cycles
//! into blossoms, and adjust dual variables until an augmenting path of
//! tight edges appears. Run in maximum-cardinality mode on the transformed
//! weights `W + 1 − w`, every maximum matching is perfect when one exists,
//! and the heaviest one under the transformed weights is the lightest under
//! the original weights.
//!
//! Weights are rescaled to integers (relative precision 1e-12) so that all
//! dual updates are exact.
//!
//! # Complexity
//!
//! O(n³) for n vertices.
//!
//! # Reference
//!
//! Galil, Z. (1986). "Efficient algorithms for finding maximum matching in
//! graphs", *ACM Computing Surveys* 18(1), 23-38.

use crate::error::{Result, RoutingError};

const NONE: usize = usize::MAX;
const SCALE_TARGET: f64 = 1e12;

/// Computes a minimum-weight perfect matching.
///
/// `edges` are `(u, v, weight)` triples over vertices `0..num_vertices`
/// with finite non-negative weights; missing pairs cannot be matched.
/// Returns the matched pairs as `(a, b)` with `a < b`, sorted by `a`.
///
/// Fails with [`RoutingError::DegenerateMatching`] when no perfect matching
/// exists (odd vertex count, isolated vertices, or an unbalanced component).
///
/// # Examples
///
/// ```
/// use u_arc_routing::postman::min_weight_perfect_matching;
///
/// // Square 0-1-2-3 with cheap sides 0-1 and 2-3.
/// let edges = [
///     (0, 1, 1.0), (1, 2, 5.0), (2, 3, 1.0), (3, 0, 5.0),
///     (0, 2, 4.0), (1, 3, 4.0),
/// ];
/// let pairs = min_weight_perfect_matching(4, &edges).unwrap();
/// assert_eq!(pairs, vec![(0, 1), (2, 3)]);
/// ```
pub fn min_weight_perfect_matching(
    num_vertices: usize,
    edges: &[(usize, usize, f64)],
) -> Result<Vec<(usize, usize)>> {
    if num_vertices == 0 {
        return Ok(Vec::new());
    }

    let mut max_weight: f64 = 0.0;
    for &(u, v, w) in edges {
        if u >= num_vertices {
            return Err(RoutingError::UnknownNode { node: u });
        }
        if v >= num_vertices {
            return Err(RoutingError::UnknownNode { node: v });
        }
        if u == v || !w.is_finite() || w < 0.0 {
            return Err(RoutingError::InvalidEdge { u, v, length: w });
        }
        max_weight = max_weight.max(w);
    }

    let scale = if max_weight > 0.0 {
        SCALE_TARGET / max_weight
    } else {
        1.0
    };
    let quantized: Vec<i64> = edges
        .iter()
        .map(|&(_, _, w)| (w * scale).round() as i64)
        .collect();
    let top = quantized.iter().copied().max().unwrap_or(0) + 1;
    let transformed: Vec<(usize, usize, i64)> = edges
        .iter()
        .zip(&quantized)
        .map(|(&(u, v, _), &q)| (u, v, top - q))
        .collect();

    let mate = Matcher::new(num_vertices, transformed).solve();

    let unmatched: Vec<usize> = (0..num_vertices).filter(|&v| mate[v] == NONE).collect();
    if !unmatched.is_empty() {
        return Err(RoutingError::DegenerateMatching { unmatched });
    }

    Ok((0..num_vertices)
        .filter(|&v| v < mate[v])
        .map(|v| (v, mate[v]))
        .collect())
}

/// State of the maximum-weight, maximum-cardinality blossom matcher.
///
/// Vertices are `0..n`, blossoms `n..2n`. Edge `k` has endpoints `2k` and
/// `2k + 1`; `endpoint[p]` is the vertex of endpoint `p`, and `p ^ 1` is the
/// opposite endpoint of the same edge.
struct Matcher {
    n: usize,
    edges: Vec<(usize, usize, i64)>,
    endpoint: Vec<usize>,
    neighbend: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, or `NONE`.
    mate: Vec<usize>,
    /// 0 = free, 1 = S, 2 = T; bit 4 marks a breadcrumb during scans.
    label: Vec<u8>,
    labelend: Vec<usize>,
    inblossom: Vec<usize>,
    blossomparent: Vec<usize>,
    blossomchilds: Vec<Vec<usize>>,
    blossombase: Vec<usize>,
    blossomendps: Vec<Vec<usize>>,
    bestedge: Vec<usize>,
    blossombestedges: Vec<Option<Vec<usize>>>,
    unusedblossoms: Vec<usize>,
    dualvar: Vec<i64>,
    allowedge: Vec<bool>,
    queue: Vec<usize>,
}

impl Matcher {
    fn new(n: usize, edges: Vec<(usize, usize, i64)>) -> Self {
        let nedge = edges.len();
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);

        let mut endpoint = Vec::with_capacity(2 * nedge);
        let mut neighbend = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        let mut blossombase: Vec<usize> = (0..n).collect();
        blossombase.extend(std::iter::repeat(NONE).take(n));
        let mut dualvar = vec![max_weight; n];
        dualvar.extend(std::iter::repeat(0).take(n));

        Self {
            n,
            edges,
            endpoint,
            neighbend,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            labelend: vec![NONE; 2 * n],
            inblossom: (0..n).collect(),
            blossomparent: vec![NONE; 2 * n],
            blossomchilds: vec![Vec::new(); 2 * n],
            blossombase,
            blossomendps: vec![Vec::new(); 2 * n],
            bestedge: vec![NONE; 2 * n],
            blossombestedges: vec![None; 2 * n],
            unusedblossoms: (n..2 * n).collect(),
            dualvar,
            allowedge: vec![false; nedge],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (i, j, w) = self.edges[k];
        self.dualvar[i] + self.dualvar[j] - 2 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                leaves.push(t);
            } else {
                stack.extend(self.blossomchilds[t].iter().rev().copied());
            }
        }
        leaves
    }

    /// Labels the top-level blossom of `w` with `t` (1 = S, 2 = T), reached
    /// through endpoint `p`.
    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.inblossom[w];
        debug_assert!(self.label[w] == 0 && self.label[b] == 0);
        self.label[w] = t;
        self.label[b] = t;
        self.labelend[w] = p;
        self.labelend[b] = p;
        self.bestedge[w] = NONE;
        self.bestedge[b] = NONE;
        if t == 1 {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base = self.blossombase[b];
            let mate_base = self.mate[base];
            debug_assert!(mate_base != NONE);
            self.assign_label(self.endpoint[mate_base], 1, mate_base ^ 1);
        }
    }

    /// Traces back from `v` and `w` to find a new blossom base, or `NONE` if
    /// the trees are different (an augmenting path).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        while v != NONE || w != NONE {
            let mut b = self.inblossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossombase[b];
                break;
            }
            debug_assert_eq!(self.label[b], 1);
            path.push(b);
            self.label[b] = 5;
            if self.labelend[b] == NONE {
                v = NONE;
            } else {
                v = self.endpoint[self.labelend[b]];
                b = self.inblossom[v];
                debug_assert_eq!(self.label[b], 2);
                v = self.endpoint[self.labelend[b]];
            }
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    /// Shrinks the odd cycle closed by edge `k` into a new blossom at `base`.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];
        let b = self
            .unusedblossoms
            .pop()
            .expect("at most n blossoms exist at once");
        self.blossombase[b] = base;
        self.blossomparent[b] = NONE;
        self.blossomparent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossomparent[bv] = b;
            path.push(bv);
            endps.push(self.labelend[bv]);
            v = self.endpoint[self.labelend[bv]];
            bv = self.inblossom[v];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossomparent[bw] = b;
            path.push(bw);
            endps.push(self.labelend[bw] ^ 1);
            w = self.endpoint[self.labelend[bw]];
            bw = self.inblossom[w];
        }

        debug_assert_eq!(self.label[bb], 1);
        self.label[b] = 1;
        self.labelend[b] = self.labelend[bb];
        self.dualvar[b] = 0;

        for leaf in self.blossom_leaves_of(&path) {
            if self.label[self.inblossom[leaf]] == 2 {
                self.queue.push(leaf);
            }
            self.inblossom[leaf] = b;
        }

        let mut bestedgeto = vec![NONE; 2 * self.n];
        for &sub in &path {
            let nblist: Vec<usize> = match self.blossombestedges[sub].take() {
                Some(list) => list,
                None => self
                    .blossom_leaves(sub)
                    .into_iter()
                    .flat_map(|leaf| self.neighbend[leaf].iter().map(|&p| p / 2))
                    .collect(),
            };
            for kk in nblist {
                let (i, j, _) = self.edges[kk];
                let far = if self.inblossom[j] == b { i } else { j };
                let bj = self.inblossom[far];
                if bj != b
                    && self.label[bj] == 1
                    && (bestedgeto[bj] == NONE || self.slack(kk) < self.slack(bestedgeto[bj]))
                {
                    bestedgeto[bj] = kk;
                }
            }
            self.bestedge[sub] = NONE;
        }

        let best_list: Vec<usize> = bestedgeto.into_iter().filter(|&e| e != NONE).collect();
        let mut best = NONE;
        for &kk in &best_list {
            if best == NONE || self.slack(kk) < self.slack(best) {
                best = kk;
            }
        }
        self.blossombestedges[b] = Some(best_list);
        self.bestedge[b] = best;
        self.blossomchilds[b] = path;
        self.blossomendps[b] = endps;
    }

    fn blossom_leaves_of(&self, subs: &[usize]) -> Vec<usize> {
        subs.iter().flat_map(|&s| self.blossom_leaves(s)).collect()
    }

    fn child_at(&self, b: usize, j: isize) -> usize {
        let len = self.blossomchilds[b].len() as isize;
        self.blossomchilds[b][j.rem_euclid(len) as usize]
    }

    fn endp_at(&self, b: usize, j: isize) -> usize {
        let len = self.blossomendps[b].len() as isize;
        self.blossomendps[b][j.rem_euclid(len) as usize]
    }

    /// Dissolves top-level blossom `b`, relabelling its children when the
    /// blossom was a T-blossom in the middle of a stage.
    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let children = self.blossomchilds[b].clone();
        for &s in &children {
            self.blossomparent[s] = NONE;
            if s < self.n {
                self.inblossom[s] = s;
            } else if endstage && self.dualvar[s] == 0 {
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.inblossom[leaf] = s;
                }
            }
        }

        if !endstage && self.label[b] == 2 {
            debug_assert!(self.labelend[b] != NONE);
            let entrychild = self.inblossom[self.endpoint[self.labelend[b] ^ 1]];
            let len = children.len() as isize;
            let mut j = children
                .iter()
                .position(|&c| c == entrychild)
                .expect("entry child belongs to the blossom") as isize;
            let (jstep, endptrick): (isize, usize) = if j & 1 == 1 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };

            let mut p = self.labelend[b];
            while j != 0 {
                // Relabel the T-sub-blossom.
                self.label[self.endpoint[p ^ 1]] = 0;
                let q = self.endp_at(b, j - endptrick as isize) ^ endptrick ^ 1;
                self.label[self.endpoint[q]] = 0;
                self.assign_label(self.endpoint[p ^ 1], 2, p);
                // Step to the next S-sub-blossom and note its forward endpoint.
                let e = self.endp_at(b, j - endptrick as isize) / 2;
                self.allowedge[e] = true;
                j += jstep;
                p = self.endp_at(b, j - endptrick as isize) ^ endptrick;
                // Step to the next T-sub-blossom.
                self.allowedge[p / 2] = true;
                j += jstep;
            }

            // Relabel the base T-sub-blossom without stepping to its mate.
            let bv = self.child_at(b, j);
            let tip = self.endpoint[p ^ 1];
            self.label[tip] = 2;
            self.label[bv] = 2;
            self.labelend[tip] = p;
            self.labelend[bv] = p;
            self.bestedge[bv] = NONE;

            j += jstep;
            while self.child_at(b, j) != entrychild {
                let bv = self.child_at(b, j);
                if self.label[bv] == 1 {
                    j += jstep;
                    continue;
                }
                let labelled = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != 0);
                if let Some(leaf) = labelled {
                    debug_assert_eq!(self.label[leaf], 2);
                    debug_assert_eq!(self.inblossom[leaf], bv);
                    self.label[leaf] = 0;
                    let mate_base = self.mate[self.blossombase[bv]];
                    self.label[self.endpoint[mate_base]] = 0;
                    self.assign_label(leaf, 2, self.labelend[leaf]);
                }
                j += jstep;
            }
        }

        self.label[b] = 0;
        self.labelend[b] = NONE;
        self.blossomchilds[b].clear();
        self.blossomendps[b].clear();
        self.blossombase[b] = NONE;
        self.blossombestedges[b] = None;
        self.bestedge[b] = NONE;
        self.unusedblossoms.push(b);
    }

    /// Swaps matched and unmatched edges along the even path inside blossom
    /// `b` from vertex `v` to the base, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossomparent[t] != b {
            t = self.blossomparent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossomchilds[b].len() as isize;
        let i = self.blossomchilds[b]
            .iter()
            .position(|&c| c == t)
            .expect("child belongs to the blossom");
        let mut j = i as isize;
        let (jstep, endptrick): (isize, usize) = if j & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += jstep;
            let t = self.child_at(b, j);
            let p = self.endp_at(b, j - endptrick as isize) ^ endptrick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += jstep;
            let t = self.child_at(b, j);
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossomchilds[b].rotate_left(i);
        self.blossomendps[b].rotate_left(i);
        self.blossombase[b] = self.blossombase[self.blossomchilds[b][0]];
        debug_assert_eq!(self.blossombase[b], v);
    }

    /// Augments the matching along the path through edge `k`.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, start_p) in [(v, 2 * k + 1), (w, 2 * k)] {
            let mut s = start;
            let mut p = start_p;
            loop {
                let bs = self.inblossom[s];
                debug_assert_eq!(self.label[bs], 1);
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.labelend[bs] == NONE {
                    break;
                }
                let t = self.endpoint[self.labelend[bs]];
                let bt = self.inblossom[t];
                debug_assert_eq!(self.label[bt], 2);
                s = self.endpoint[self.labelend[bt]];
                let j = self.endpoint[self.labelend[bt] ^ 1];
                debug_assert_eq!(self.blossombase[bt], t);
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.labelend[bt];
                p = self.labelend[bt] ^ 1;
            }
        }
    }

    /// Runs all stages and returns, for each vertex, its partner or `NONE`.
    fn solve(mut self) -> Vec<usize> {
        let n = self.n;
        if self.edges.is_empty() {
            return vec![NONE; n];
        }

        for _stage in 0..n {
            self.label.iter_mut().for_each(|l| *l = 0);
            self.bestedge.iter_mut().for_each(|e| *e = NONE);
            for b in n..2 * n {
                self.blossombestedges[b] = None;
            }
            self.allowedge.iter_mut().for_each(|a| *a = false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.inblossom[v]] == 0 {
                    self.assign_label(v, 1, NONE);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else { break };
                    debug_assert_eq!(self.label[self.inblossom[v]], 1);

                    let ends = self.neighbend[v].clone();
                    for p in ends {
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.inblossom[v] == self.inblossom[w] {
                            continue;
                        }
                        let mut kslack = 0;
                        if !self.allowedge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allowedge[k] = true;
                            }
                        }
                        if self.allowedge[k] {
                            if self.label[self.inblossom[w]] == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if self.label[self.inblossom[w]] == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NONE {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                debug_assert_eq!(self.label[self.inblossom[w]], 2);
                                self.label[w] = 2;
                                self.labelend[w] = p ^ 1;
                            }
                        } else if self.label[self.inblossom[w]] == 1 {
                            let b = self.inblossom[v];
                            if self.bestedge[b] == NONE || kslack < self.slack(self.bestedge[b]) {
                                self.bestedge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.bestedge[w] == NONE || kslack < self.slack(self.bestedge[w]))
                        {
                            self.bestedge[w] = k;
                        }
                    }
                }

                if augmented {
                    break;
                }

                // No augmenting path with tight edges: pick the dual update.
                let mut deltatype = 0u8;
                let mut delta = 0i64;
                let mut deltaedge = NONE;
                let mut deltablossom = NONE;

                for v in 0..n {
                    if self.label[self.inblossom[v]] == 0 && self.bestedge[v] != NONE {
                        let d = self.slack(self.bestedge[v]);
                        if deltatype == 0 || d < delta {
                            delta = d;
                            deltatype = 2;
                            deltaedge = self.bestedge[v];
                        }
                    }
                }

                for b in 0..2 * n {
                    if self.blossomparent[b] == NONE
                        && self.label[b] == 1
                        && self.bestedge[b] != NONE
                    {
                        let kslack = self.slack(self.bestedge[b]);
                        debug_assert_eq!(kslack % 2, 0);
                        let d = kslack / 2;
                        if deltatype == 0 || d < delta {
                            delta = d;
                            deltatype = 3;
                            deltaedge = self.bestedge[b];
                        }
                    }
                }

                for b in n..2 * n {
                    if self.blossombase[b] != NONE
                        && self.blossomparent[b] == NONE
                        && self.label[b] == 2
                        && (deltatype == 0 || self.dualvar[b] < delta)
                    {
                        delta = self.dualvar[b];
                        deltatype = 4;
                        deltablossom = b;
                    }
                }

                if deltatype == 0 {
                    // Maximum cardinality reached; finish with vertex duals.
                    deltatype = 1;
                    delta = self.dualvar[..n].iter().copied().min().unwrap_or(0).max(0);
                }

                for v in 0..n {
                    match self.label[self.inblossom[v]] {
                        1 => self.dualvar[v] -= delta,
                        2 => self.dualvar[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossombase[b] != NONE && self.blossomparent[b] == NONE {
                        match self.label[b] {
                            1 => self.dualvar[b] += delta,
                            2 => self.dualvar[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match deltatype {
                    1 => break,
                    2 => {
                        self.allowedge[deltaedge] = true;
                        let (mut i, j, _) = self.edges[deltaedge];
                        if self.label[self.inblossom[i]] == 0 {
                            i = j;
                        }
                        debug_assert_eq!(self.label[self.inblossom[i]], 1);
                        self.queue.push(i);
                    }
                    3 => {
                        self.allowedge[deltaedge] = true;
                        let (i, _, _) = self.edges[deltaedge];
                        debug_assert_eq!(self.label[self.inblossom[i]], 1);
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(deltablossom, false),
                }
            }

            if !augmented {
                break;
            }

            for b in n..2 * n {
                if self.blossomparent[b] == NONE
                    && self.blossombase[b] != NONE
                    && self.label[b] == 1
                    && self.dualvar[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        (0..n)
            .map(|v| {
                let p = self.mate[v];
                if p == NONE {
                    NONE
                } else {
                    self.endpoint[p]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn total(edges: &[(usize, usize, f64)], pairs: &[(usize, usize)]) -> f64 {
        pairs
            .iter()
            .map(|&(a, b)| {
                edges
                    .iter()
                    .filter(|&&(u, v, _)| (u, v) == (a, b) || (v, u) == (a, b))
                    .map(|e| e.2)
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    /// Exhaustive minimum over all perfect matchings (bitmask DP).
    fn brute_force(n: usize, weight: &[Vec<f64>]) -> f64 {
        let full = (1usize << n) - 1;
        let mut best = vec![f64::INFINITY; 1 << n];
        best[0] = 0.0;
        for mask in 0..=full {
            if best[mask].is_infinite() {
                continue;
            }
            let Some(i) = (0..n).find(|&i| mask & (1 << i) == 0) else {
                continue;
            };
            for j in (i + 1)..n {
                if mask & (1 << j) == 0 && weight[i][j].is_finite() {
                    let next = mask | (1 << i) | (1 << j);
                    best[next] = best[next].min(best[mask] + weight[i][j]);
                }
            }
        }
        best[full]
    }

    #[test]
    fn test_empty() {
        assert_eq!(min_weight_perfect_matching(0, &[]).expect("trivial"), vec![]);
    }

    #[test]
    fn test_single_pair() {
        let pairs = min_weight_perfect_matching(2, &[(1, 0, 7.0)]).expect("perfect");
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_prefers_lighter_pairing() {
        let edges = [
            (0, 1, 10.0),
            (2, 3, 10.0),
            (0, 2, 1.0),
            (1, 3, 1.0),
            (0, 3, 6.0),
            (1, 2, 6.0),
        ];
        let pairs = min_weight_perfect_matching(4, &edges).expect("perfect");
        assert_eq!(pairs, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_needs_blossom() {
        // Triangle 0-1-2 with a pendant 3 on vertex 2 and 4-5 elsewhere.
        let edges = [
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (2, 3, 8.0),
            (0, 3, 9.0),
            (3, 4, 2.0),
            (4, 5, 1.0),
            (1, 5, 3.0),
        ];
        let pairs = min_weight_perfect_matching(6, &edges).expect("perfect");
        let got = total(&edges, &pairs);
        // 0-1 (1) + 2-3 (8) + 4-5 (1) = 10, vs 0-2 (1) + 1-5 (3) + 3-4 (2) = 6
        assert!((got - 6.0).abs() < 1e-9);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_odd_vertex_count_is_degenerate() {
        let err = min_weight_perfect_matching(3, &[(0, 1, 1.0), (1, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, RoutingError::DegenerateMatching { .. }));
    }

    #[test]
    fn test_disconnected_is_degenerate() {
        // Components {0,1,2} and {3}: no perfect matching.
        let edges = [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)];
        match min_weight_perfect_matching(4, &edges) {
            Err(RoutingError::DegenerateMatching { unmatched }) => assert_eq!(unmatched.len(), 2),
            other => panic!("expected degenerate matching, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_weights() {
        let edges = [(0, 1, 0.0), (2, 3, 0.0), (0, 2, 0.0), (1, 3, 0.0)];
        let pairs = min_weight_perfect_matching(4, &edges).expect("perfect");
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(min_weight_perfect_matching(2, &[(0, 2, 1.0)]).is_err());
        assert!(min_weight_perfect_matching(2, &[(0, 1, -1.0)]).is_err());
        assert!(min_weight_perfect_matching(2, &[(1, 1, 1.0)]).is_err());
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force_on_complete_graphs(
            half in 1usize..6,
            raw in proptest::collection::vec(0u32..1000, 66),
        ) {
            let n = 2 * half;
            let mut weight = vec![vec![f64::INFINITY; n]; n];
            let mut edges = Vec::new();
            let mut idx = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    let w = raw[idx] as f64;
                    idx += 1;
                    weight[i][j] = w;
                    weight[j][i] = w;
                    edges.push((i, j, w));
                }
            }
            let pairs = min_weight_perfect_matching(n, &edges).expect("complete graph");
            prop_assert_eq!(pairs.len(), half);
            let mut seen = vec![false; n];
            for &(a, b) in &pairs {
                prop_assert!(!seen[a] && !seen[b]);
                seen[a] = true;
                seen[b] = true;
            }
            let expected = brute_force(n, &weight);
            prop_assert!((total(&edges, &pairs) - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_matches_brute_force_on_sparse_graphs(
            half in 1usize..5,
            raw in proptest::collection::vec((0u32..50, proptest::bool::weighted(0.6)), 45),
        ) {
            let n = 2 * half;
            let mut weight = vec![vec![f64::INFINITY; n]; n];
            let mut edges = Vec::new();
            let mut idx = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    let (w, present) = raw[idx];
                    idx += 1;
                    if present {
                        weight[i][j] = w as f64;
                        weight[j][i] = w as f64;
                        edges.push((i, j, w as f64));
                    }
                }
            }
            let expected = brute_force(n, &weight);
            match min_weight_perfect_matching(n, &edges) {
                Ok(pairs) => {
                    prop_assert!(expected.is_finite());
                    prop_assert!((total(&edges, &pairs) - expected).abs() < 1e-6);
                }
                Err(RoutingError::DegenerateMatching { .. }) => prop_assert!(expected.is_infinite()),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
