//! Bulk-parallel edge deletion.

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::aggregate::Aggregation;
use crate::forest::edge_map::EdgeKey;
use crate::forest::{EulerTourForest, SEQUENTIAL_BATCH_THRESHOLD};
use crate::list::NIL;

/// One cut in this many is deferred to the next round, bounding the length
/// of any marked chain the bridge walk has to hop over.
const CUT_DEFER_FACTOR: u64 = 100;

impl<A: Aggregation> EulerTourForest<A> {
    /// Removes every edge in `cuts`. The edges must be present and
    /// distinct.
    ///
    /// Each round marks the elements of a random ~`1 - 1/100` share of the
    /// remaining cuts, computes the bridge joins that reconnect the tour
    /// fragments around them, excises the marked elements, and defers the
    /// rest. Expected recursion depth is logarithmic in the batch size
    /// regardless of how the cut edges chain together.
    #[instrument(name = "forest.batch_cut", level = "debug", skip_all, fields(edges = cuts.len()))]
    pub fn batch_cut(&mut self, cuts: &[(usize, usize)]) {
        let mut remaining = cuts.to_vec();
        while remaining.len() > SEQUENTIAL_BATCH_THRESHOLD {
            remaining = self.batch_cut_round(&remaining);
            trace!(deferred = remaining.len(), "batch cut round complete");
        }
        for &(u, v) in &remaining {
            self.cut(u, v);
        }
        debug!(edges = cuts.len(), "batch cut complete");
    }

    /// Executes one sampled round and returns the deferred cuts.
    fn batch_cut_round(&mut self, cuts: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let randomness = self.randomness;
        self.randomness = self.randomness.next();

        let deferred: Vec<bool> = (0..cuts.len())
            .into_par_iter()
            .map(|i| randomness.ith(i) % CUT_DEFER_FACTOR == 0)
            .collect();

        // Cache the element of every cut edge before any deletion (the
        // edge map does not allow finds to overlap deletes) and mark both
        // occurrences for this round.
        let edge_elements: Vec<usize> = cuts
            .par_iter()
            .enumerate()
            .map(|(i, &(u, v))| {
                if deferred[i] {
                    return NIL;
                }
                let uv = self.directed_edge(u, v);
                self.list.set_split_mark(uv);
                self.list.set_split_mark(self.list.twin(uv));
                uv
            })
            .collect();

        // Pick the two bridge joins per cut while the tour is still intact.
        let bridges: Vec<[Option<(usize, usize)>; 2]> = cuts
            .par_iter()
            .enumerate()
            .map(|(i, _)| {
                if deferred[i] {
                    return [None, None];
                }
                let uv = edge_elements[i];
                let vu = self.list.twin(uv);
                [self.bridge(uv, vu), self.bridge(vu, uv)]
            })
            .collect();

        // Isolate the marked elements: sever after each occurrence and
        // after each occurrence's predecessor.
        let split_points: Vec<usize> = cuts
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, _)| {
                if deferred[i] {
                    return Vec::new();
                }
                let uv = edge_elements[i];
                let vu = self.list.twin(uv);
                vec![uv, vu, self.list.prev(uv, 0), self.list.prev(vu, 0)]
            })
            .collect();
        self.list.batch_split(&split_points);

        cuts.par_iter().enumerate().for_each(|(i, &(u, v))| {
            if !deferred[i] {
                self.edges.remove(EdgeKey::new(u, v));
            }
        });

        let joins: Vec<(usize, usize)> = bridges
            .par_iter()
            .flat_map_iter(|pair| pair.iter().flatten().copied())
            .collect();
        self.list.batch_join(&joins);

        let freed: Vec<usize> = edge_elements
            .par_iter()
            .filter(|&&uv| uv != NIL)
            .flat_map_iter(|&uv| [uv, self.list.twin(uv)])
            .collect();
        self.list.release(&freed);

        cuts.par_iter()
            .enumerate()
            .filter_map(|(i, &cut)| deferred[i].then_some(cut))
            .collect()
    }

    /// Join pair reconnecting the fragment left of `uv` to the fragment
    /// right of `vu`, or `None` when the cut owning the marked predecessor
    /// performs it instead. Marked successors are hopped over through their
    /// twins until a surviving element is reached.
    fn bridge(&self, uv: usize, vu: usize) -> Option<(usize, usize)> {
        let left = self.list.prev(uv, 0);
        if self.list.split_mark(left) {
            return None;
        }
        let mut right = self.list.next(vu, 0);
        while self.list.split_mark(right) {
            right = self.list.next(self.list.twin(right), 0);
        }
        Some((left, right))
    }
}
