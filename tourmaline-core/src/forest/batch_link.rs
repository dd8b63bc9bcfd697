//! Bulk-parallel edge insertion.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::aggregate::Aggregation;
use crate::forest::edge_map::EdgeKey;
use crate::forest::{EulerTourForest, SEQUENTIAL_BATCH_THRESHOLD};

impl<A: Aggregation> EulerTourForest<A> {
    /// Adds every edge in `links`. The additions together must keep the
    /// graph a forest, and no edge may appear twice.
    ///
    /// Both directed occurrences are sorted by source vertex, so each
    /// vertex's new neighbours form one contiguous run `y₁ … y_k`. The tour
    /// of `x` is severed once, after `(x, x)`; the stitches
    /// `x → (x, y₁)`, `(yᵢ, x) → (x, yᵢ₊₁)` and `(y_k, x) → succ(x)` are
    /// then independent, every boundary element being the endpoint of
    /// exactly one join.
    #[instrument(name = "forest.batch_link", level = "debug", skip_all, fields(edges = links.len()))]
    pub fn batch_link(&mut self, links: &[(usize, usize)]) {
        if links.len() <= SEQUENTIAL_BATCH_THRESHOLD {
            for &(u, v) in links {
                self.link(u, v);
            }
            return;
        }

        let mut directed: Vec<(usize, usize)> = Vec::with_capacity(2 * links.len());
        for &(u, v) in links {
            directed.push((u, v));
            directed.push((v, u));
        }
        directed.par_sort_unstable();

        // One element pair per undirected edge, wired and registered.
        let creators: Vec<usize> = directed
            .par_iter()
            .enumerate()
            .filter_map(|(i, &(u, v))| (u < v).then_some(i))
            .collect();
        let slots = self.list.acquire(2 * creators.len());
        creators.par_iter().enumerate().for_each(|(pair, &i)| {
            let (u, v) = directed[i];
            let uv = slots[2 * pair];
            let vu = slots[2 * pair + 1];
            self.list.set_twins(uv, vu);
            self.edges.insert(EdgeKey::new(u, v), uv);
        });

        // Sever each touched vertex tour once, after its last occurrence.
        let successors: Vec<Option<usize>> = directed
            .par_iter()
            .enumerate()
            .map(|(i, &(u, _))| {
                let last = i + 1 == directed.len() || directed[i + 1].0 != u;
                last.then(|| self.list.split(u).expect("vertex tours are cyclic"))
            })
            .collect();

        let joins: Vec<(usize, usize)> = directed
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, &(u, v))| {
                let uv = self.directed_edge(u, v);
                let vu = self.list.twin(uv);
                let mut stitches = Vec::with_capacity(2);
                if i == 0 || directed[i - 1].0 != u {
                    stitches.push((u, uv));
                }
                match successors[i] {
                    Some(successor) => stitches.push((vu, successor)),
                    None => {
                        let (u2, v2) = directed[i + 1];
                        stitches.push((vu, self.directed_edge(u2, v2)));
                    }
                }
                stitches
            })
            .collect();
        self.list.batch_join(&joins);
        debug!(edges = links.len(), "batch link complete");
    }
}
