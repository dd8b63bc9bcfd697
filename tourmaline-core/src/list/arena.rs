//! Element arena backing the batch-parallel skip list.
//!
//! All elements of a forest live in one fixed arena of `3n - 2` slots: `n`
//! vertex slots followed by `2(n - 1)` edge slots recycled through a free
//! list. Heights are sampled once at construction from the seeded RNG, so a
//! seed determines the list shape for the lifetime of the structure.

use std::sync::atomic::Ordering;
use std::sync::Mutex;

use crate::aggregate::Aggregation;
use crate::list::node::{Node, LEVEL_CLEAR, NIL};
use crate::rng::{height_rng, sample_height};

/// Arena of skip-list elements with atomic linkage.
///
/// Structural and repair operations take `&self` and are driven from Rayon
/// tasks; exclusivity of writes follows from the batch preconditions
/// (disjoint boundaries) and the `update_level` claiming protocol.
#[derive(Debug)]
pub(crate) struct AugmentedList<A: Aggregation> {
    nodes: Box<[Node<A::Value>]>,
    free: Mutex<Vec<usize>>,
    default_value: A::Value,
}

impl<A: Aggregation> AugmentedList<A> {
    /// Lays out `slots` elements with seeded heights. The caller decides
    /// which slot range is handed out through [`Self::acquire`].
    pub(crate) fn new(slots: usize, reserved: usize, default_value: A::Value, seed: u64) -> Self {
        let mut rng = height_rng(seed);
        let nodes = (0..slots)
            .map(|_| Node::new(sample_height(&mut rng), default_value.clone()))
            .collect();
        let free = (reserved..slots).rev().collect();
        Self {
            nodes,
            free: Mutex::new(free),
            default_value,
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: usize) -> &Node<A::Value> {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn height(&self, id: usize) -> usize {
        self.nodes[id].height()
    }

    #[inline]
    pub(crate) fn next(&self, id: usize, level: usize) -> usize {
        self.nodes[id].link(level).next.load(Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn prev(&self, id: usize, level: usize) -> usize {
        self.nodes[id].link(level).prev.load(Ordering::SeqCst)
    }

    #[inline]
    pub(crate) fn twin(&self, id: usize) -> usize {
        self.nodes[id].twin.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn split_mark(&self, id: usize) -> bool {
        self.nodes[id].split_mark.load(Ordering::Acquire)
    }

    /// Reads the aggregate stored on `id` at `level`.
    ///
    /// Callers must not overlap this with a repair pass that owns the cell;
    /// public queries run on a quiescent structure.
    #[inline]
    pub(crate) fn value(&self, id: usize, level: usize) -> &A::Value {
        // Safety: see `ValueCell`; reads only happen outside the owning
        // writer's phase.
        unsafe { self.nodes[id].value(level).get() }
    }

    /// Overwrites the aggregate stored on `id` at `level`.
    #[inline]
    pub(crate) fn set_value(&self, id: usize, level: usize, value: A::Value) {
        // Safety: the caller is the cell's elected writer for this phase.
        unsafe { self.nodes[id].value(level).set(value) }
    }

    fn reset(&self, id: usize) {
        let node = &self.nodes[id];
        debug_assert!(node.is_unlinked(), "recycled element {id} is still linked");
        debug_assert_eq!(node.update_level.load(Ordering::Acquire), LEVEL_CLEAR);
        for level in 0..node.height() {
            self.set_value(id, level, self.default_value.clone());
        }
        node.twin.store(NIL, Ordering::Release);
        node.split_mark.store(false, Ordering::Release);
    }

    /// Takes `count` recycled slots out of the free list, resetting each to
    /// the default value with no twin and no mark.
    pub(crate) fn acquire(&self, count: usize) -> Vec<usize> {
        let mut free = self.free.lock().expect("free list mutex poisoned");
        let at = free.len().checked_sub(count).expect("element pool exhausted");
        let taken = free.split_off(at);
        drop(free);
        for &id in &taken {
            self.reset(id);
        }
        taken
    }

    /// Returns slots to the free list. Elements must already be unlinked.
    pub(crate) fn release(&self, ids: &[usize]) {
        let mut free = self.free.lock().expect("free list mutex poisoned");
        free.extend_from_slice(ids);
    }

    /// Wires two directed edge occurrences to each other.
    pub(crate) fn set_twins(&self, a: usize, b: usize) {
        self.nodes[a].twin.store(b, Ordering::Release);
        self.nodes[b].twin.store(a, Ordering::Release);
    }

    pub(crate) fn set_split_mark(&self, id: usize) {
        self.nodes[id].split_mark.store(true, Ordering::Release);
    }
}
