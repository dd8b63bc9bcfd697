//! Euler tour forests.
//!
//! Each tree in the forest is represented by the cyclic Euler tour of its
//! vertices and directed edge occurrences, stored as one cyclic augmented
//! skip list. Linking and cutting reduce to a constant number of tour
//! splits and joins; the batch variants run the splits and joins of a whole
//! edge set in parallel.

mod batch_cut;
mod batch_link;
mod edge_map;


use rayon::prelude::*;
use tracing::debug;

use crate::aggregate::Aggregation;
use crate::list::AugmentedList;
use crate::rng::Randomness;

use self::edge_map::{EdgeKey, EdgeMap};

/// Batches at or below this size run the sequential single-edge loop.
const SEQUENTIAL_BATCH_THRESHOLD: usize = 75;

/// A dynamic forest over the fixed vertex set `{0, …, n-1}`.
///
/// Structural preconditions are caller obligations and are not validated:
/// `link` must not close a cycle, `cut` requires a present edge, and the
/// edges of one batch must be distinct. Vertex indices outside `[0, n)`
/// panic. Mutating operations take `&mut self`, so queries always observe a
/// fully repaired structure.
///
/// # Examples
/// ```
/// use tourmaline_core::{ForestBuilder, Sum};
///
/// let mut forest = ForestBuilder::<Sum<i64>>::new(4, 1)
///     .build()
///     .expect("vertex count is valid");
/// forest.link(0, 1);
/// forest.link(1, 2);
/// assert!(forest.is_connected(0, 2));
/// assert!(!forest.is_connected(0, 3));
/// // three vertices and two edges, each edge visited twice
/// assert_eq!(forest.tree_aggregate(0), 3 + 2 * 2);
/// forest.cut(1, 2);
/// assert!(!forest.is_connected(0, 2));
/// ```
#[derive(Debug)]
pub struct EulerTourForest<A: Aggregation> {
    num_vertices: usize,
    list: AugmentedList<A>,
    edges: EdgeMap,
    randomness: Randomness,
}

impl<A: Aggregation> EulerTourForest<A> {
    /// Builds the n singleton tours. Slots `0..n` are the vertex elements;
    /// the remaining `2(n-1)` slots cycle through the edge pool.
    pub(crate) fn with_vertices(num_vertices: usize, default_value: A::Value, seed: u64) -> Self {
        let slots = 3 * num_vertices - 2;
        let list = AugmentedList::<A>::new(slots, num_vertices, default_value, seed);
        (0..num_vertices)
            .into_par_iter()
            .for_each(|v| list.join(v, v));
        debug!(num_vertices, slots, "forest constructed");
        Self {
            num_vertices,
            list,
            edges: EdgeMap::new(num_vertices),
            randomness: Randomness::new(seed),
        }
    }

    /// Number of vertices the forest was built with.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges currently in the forest.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// True when `u` and `v` lie in the same tree.
    #[must_use]
    pub fn is_connected(&self, u: usize, v: usize) -> bool {
        self.list.find_representative(u) == self.list.find_representative(v)
    }

    /// The value currently assigned to vertex `v`.
    #[must_use]
    pub fn value(&self, v: usize) -> A::Value {
        debug_assert!(v < self.num_vertices);
        self.list.value(v, 0).clone()
    }

    /// Folds the aggregation over every element of `v`'s tree, anchored at
    /// the tree representative. Vertices contribute their assigned values;
    /// each edge occurrence contributes the default value.
    #[must_use]
    pub fn tree_aggregate(&self, v: usize) -> A::Value {
        debug_assert!(v < self.num_vertices);
        self.list.aggregate(v)
    }

    /// Assigns `value` to vertex `v` and refolds the aggregates above it.
    pub fn update(&mut self, v: usize, value: A::Value) {
        debug_assert!(v < self.num_vertices);
        self.list.update(v, value);
    }

    /// Applies `f` to the current value of `v` and stores the result.
    pub fn update_with<F>(&mut self, v: usize, f: F)
    where
        F: FnOnce(&A::Value) -> A::Value,
    {
        let value = f(self.list.value(v, 0));
        self.list.update(v, value);
    }

    /// Assigns `values[i]` to vertex `vertices[i]` for every `i`, repairing
    /// all stale ancestors in parallel.
    #[tracing::instrument(name = "forest.batch_update", level = "debug", skip_all, fields(vertices = vertices.len()))]
    pub fn batch_update(&mut self, vertices: &[usize], values: &[A::Value]) {
        debug_assert_eq!(vertices.len(), values.len());
        self.list.batch_update(vertices, Some(values));
    }

    /// Adds edge `{u, v}`. The edge must not close a cycle.
    pub fn link(&mut self, u: usize, v: usize) {
        let pair = self.list.acquire(2);
        let (uv, vu) = (pair[0], pair[1]);
        self.list.set_twins(uv, vu);
        self.edges
            .insert(EdgeKey::new(u, v), if u < v { uv } else { vu });

        let u_right = self.list.split(u).expect("vertex tours are cyclic");
        let v_right = self.list.split(v).expect("vertex tours are cyclic");
        self.list.join(u, uv);
        self.list.join(uv, v_right);
        self.list.join(v, vu);
        self.list.join(vu, u_right);
        for id in [u, v, u_right, v_right] {
            self.refresh(id);
        }
    }

    /// Removes edge `{u, v}`. The edge must be present.
    pub fn cut(&mut self, u: usize, v: usize) {
        let uv = self.directed_edge(u, v);
        let vu = self.list.twin(uv);
        self.edges.remove(EdgeKey::new(u, v));

        let u_left = self.list.prev(uv, 0);
        let v_left = self.list.prev(vu, 0);
        let v_right = self.list.split(uv).expect("tours are cyclic");
        let u_right = self.list.split(vu).expect("tours are cyclic");
        self.list.split(u_left);
        self.list.split(v_left);
        self.list.release(&[uv, vu]);

        self.list.join(u_left, u_right);
        self.list.join(v_left, v_right);
        for id in [u_left, v_left, u_right, v_right] {
            self.refresh(id);
        }
    }

    /// Element for the directed occurrence `(u, v)`.
    fn directed_edge(&self, u: usize, v: usize) -> usize {
        let element = self
            .edges
            .find(EdgeKey::new(u, v))
            .expect("edge is present in the forest");
        if u < v {
            element
        } else {
            self.list.twin(element)
        }
    }

    /// Refolds the ancestors of `id` from its unchanged leaf value.
    fn refresh(&self, id: usize) {
        let value = self.list.value(id, 0).clone();
        self.list.update(id, value);
    }
}
