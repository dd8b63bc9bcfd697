//! Arena node storage for the batch-parallel skip list.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Absent-neighbour sentinel for atomic slot indices.
pub(crate) const NIL: usize = usize::MAX;

/// `update_level` sentinel: no repair pending on this node.
pub(crate) const LEVEL_CLEAR: usize = usize::MAX;

/// Height cap for geometric(½) sampling.
pub(crate) const MAX_HEIGHT: usize = 32;

/// One doubly-linked level of a node.
#[derive(Debug)]
pub(crate) struct LevelLink {
    pub(crate) prev: AtomicUsize,
    pub(crate) next: AtomicUsize,
}

impl LevelLink {
    fn unlinked() -> Self {
        Self {
            prev: AtomicUsize::new(NIL),
            next: AtomicUsize::new(NIL),
        }
    }
}

/// A per-level aggregate slot.
///
/// Written without locks: the repair protocol elects exactly one writer per
/// node (the `update_level` CAS claim or the exclusive split-spine walk),
/// and batch phases are separated by Rayon barriers, so a cell is never
/// read while its writer is active.
#[derive(Debug)]
pub(crate) struct ValueCell<V>(UnsafeCell<V>);

// Safety: see `ValueCell`; exclusivity is guaranteed by the repair
// protocol, not by the type.
unsafe impl<V: Send + Sync> Sync for ValueCell<V> {}

impl<V> ValueCell<V> {
    fn new(value: V) -> Self {
        Self(UnsafeCell::new(value))
    }

    /// # Safety
    /// No writer may be active on this cell (quiescent list, or the caller
    /// holds the claim for the owning node).
    pub(crate) unsafe fn get(&self) -> &V {
        &*self.0.get()
    }

    /// # Safety
    /// The caller must be the cell's elected writer and no concurrent
    /// reader may observe the cell until the next phase barrier.
    pub(crate) unsafe fn set(&self, value: V) {
        *self.0.get() = value;
    }
}

/// A skip-list element with per-level neighbours and aggregates.
///
/// `twin` and `split_mark` belong to the Euler tour layer: `twin` pairs the
/// two directed occurrences of an edge, `split_mark` flags elements being
/// excised within one batch-cut round.
#[derive(Debug)]
pub(crate) struct Node<V> {
    height: usize,
    links: Box<[LevelLink]>,
    values: Box<[ValueCell<V>]>,
    pub(crate) update_level: AtomicUsize,
    pub(crate) twin: AtomicUsize,
    pub(crate) split_mark: AtomicBool,
}

impl<V: Clone> Node<V> {
    pub(crate) fn new(height: usize, value: V) -> Self {
        debug_assert!((1..=MAX_HEIGHT).contains(&height));
        let links = (0..height).map(|_| LevelLink::unlinked()).collect();
        let values = (0..height).map(|_| ValueCell::new(value.clone())).collect();
        Self {
            height,
            links,
            values,
            update_level: AtomicUsize::new(LEVEL_CLEAR),
            twin: AtomicUsize::new(NIL),
            split_mark: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) fn link(&self, level: usize) -> &LevelLink {
        &self.links[level]
    }

    #[inline]
    pub(crate) fn value(&self, level: usize) -> &ValueCell<V> {
        &self.values[level]
    }

    /// True when every level is detached on both sides.
    pub(crate) fn is_unlinked(&self) -> bool {
        self.links.iter().all(|link| {
            link.prev.load(Ordering::Acquire) == NIL && link.next.load(Ordering::Acquire) == NIL
        })
    }
}
