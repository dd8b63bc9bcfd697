//! Structural skip-list operations: join, split, and canonical walks.
//!
//! Sibling operations in one batch touch disjoint boundaries, but their
//! climbs converge on shared upper-level links. Each stitch (or cut) is
//! arbitrated by a CAS on the forward pointer: the winner carries the climb
//! upward, the loser stops. The CAS and the scans around it must be
//! `SeqCst`: two racing climbs must never both miss each other's
//! lower-level stitch (store-buffering), or an upper link would be dropped.

use std::sync::atomic::Ordering;

use crate::aggregate::Aggregation;
use crate::list::arena::AugmentedList;
use crate::list::node::NIL;

impl<A: Aggregation> AugmentedList<A> {
    /// Concatenates the list ending at `left` with the list starting at
    /// `right`, stitching every level reachable from both sides.
    ///
    /// `left` must be the last element of its list and `right` the first of
    /// its own; within a batch every `left` and every `right` is unique.
    pub(crate) fn join(&self, left: usize, right: usize) {
        let mut left = left;
        let mut right = right;
        let mut level = 0;
        loop {
            let stitched = self.node(left).link(level).next.compare_exchange(
                NIL,
                right,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            if stitched.is_err() {
                // A sibling join reached this link first; its climb
                // continues from here.
                return;
            }
            self.node(right).link(level).prev.store(left, Ordering::SeqCst);
            let (Some(next_left), Some(next_right)) = (
                self.find_left_parent(left, level),
                self.find_right_parent(right, level),
            ) else {
                return;
            };
            left = next_left;
            right = next_right;
            level += 1;
        }
    }

    /// Severs the list immediately after `id`, cutting every link that
    /// crosses the boundary, and returns the detached level-0 successor.
    ///
    /// Splitting a singleton cycle returns the element itself: the tour
    /// `(v)` severed after `v` leaves `v` as both halves.
    pub(crate) fn split(&self, id: usize) -> Option<usize> {
        let successor = self.next(id, 0);
        let mut cur = id;
        let mut level = 0;
        loop {
            let link = self.node(cur).link(level);
            let next = link.next.load(Ordering::SeqCst);
            if next == NIL {
                // No link crosses the boundary at this level, so none does
                // above it either (a sibling split may already own the rest).
                break;
            }
            if link
                .next
                .compare_exchange(next, NIL, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                break;
            }
            self.node(next).link(level).prev.store(NIL, Ordering::SeqCst);
            if level + 1 < self.height(cur) {
                level += 1;
            } else {
                match self.find_left_parent(cur, level) {
                    Some(parent) => {
                        cur = parent;
                        level += 1;
                    }
                    None => break,
                }
            }
        }
        (successor != NIL).then_some(successor)
    }

    /// Nearest element at or before `id` participating above `level`
    /// (height strictly greater than `level + 1`), walking the level-`level`
    /// backward links. Returns `None` at the head of an acyclic list or
    /// after a full lap of a cycle.
    pub(crate) fn find_left_parent(&self, id: usize, level: usize) -> Option<usize> {
        let mut cur = id;
        loop {
            if self.height(cur) > level + 1 {
                return Some(cur);
            }
            let prev = self.prev(cur, level);
            if prev == NIL || prev == id {
                return None;
            }
            cur = prev;
        }
    }

    /// Mirror of [`Self::find_left_parent`] along forward links.
    fn find_right_parent(&self, id: usize, level: usize) -> Option<usize> {
        let mut cur = id;
        loop {
            if self.height(cur) > level + 1 {
                return Some(cur);
            }
            let next = self.next(cur, level);
            if next == NIL || next == id {
                return None;
            }
            cur = next;
        }
    }

    /// Canonical element of `id`'s list: the leftmost element of the top
    /// level for acyclic lists, the smallest slot on the top-level ring for
    /// cycles. Two elements share a representative iff they share a list.
    pub(crate) fn find_representative(&self, id: usize) -> usize {
        let mut cur = id;
        let mut level = self.height(cur) - 1;
        'climb: loop {
            let mut scan = self.next(cur, level);
            while scan != NIL && scan != cur {
                if self.height(scan) > level + 1 {
                    cur = scan;
                    level = self.height(cur) - 1;
                    continue 'climb;
                }
                scan = self.next(scan, level);
            }
            if scan == cur {
                // Top-level ring; canonicalize independent of the start.
                let mut smallest = cur;
                let mut walk = self.next(cur, level);
                while walk != cur {
                    smallest = smallest.min(walk);
                    walk = self.next(walk, level);
                }
                return smallest;
            }
            let mut leftmost = cur;
            let mut scan = self.prev(cur, level);
            while scan != NIL {
                if self.height(scan) > level + 1 {
                    cur = scan;
                    level = self.height(cur) - 1;
                    continue 'climb;
                }
                leftmost = scan;
                scan = self.prev(scan, level);
            }
            return leftmost;
        }
    }
}
