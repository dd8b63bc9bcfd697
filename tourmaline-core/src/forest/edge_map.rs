//! Concurrent map from undirected edges to tour elements.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Canonicalized undirected edge key (`u <= v`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct EdgeKey {
    u: usize,
    v: usize,
}

impl EdgeKey {
    pub(crate) fn new(a: usize, b: usize) -> Self {
        let (u, v) = if a <= b { (a, b) } else { (b, a) };
        Self { u, v }
    }
}

/// Maps each forest edge to the element for its `(min, max)` occurrence;
/// the reverse occurrence hangs off that element's twin pointer.
///
/// Inserts and finds may overlap each other and themselves, deletes may
/// overlap deletes, but finds must not overlap deletes: batch cut caches
/// element ids before its delete phase begins.
#[derive(Debug)]
pub(crate) struct EdgeMap {
    map: DashMap<EdgeKey, usize>,
}

impl EdgeMap {
    pub(crate) fn new(num_vertices: usize) -> Self {
        Self {
            map: DashMap::with_capacity(num_vertices.saturating_sub(1)),
        }
    }

    /// Registers `element` for the edge; succeeds iff the edge is absent.
    pub(crate) fn insert(&self, key: EdgeKey, element: usize) -> bool {
        match self.map.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    pub(crate) fn remove(&self, key: EdgeKey) -> bool {
        self.map.remove(&key).is_some()
    }

    pub(crate) fn find(&self, key: EdgeKey) -> Option<usize> {
        self.map.get(&key).map(|element| *element)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}
