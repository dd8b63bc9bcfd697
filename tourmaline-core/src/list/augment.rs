//! Aggregate maintenance and queries for the augmented skip list.
//!
//! Structural batches leave per-level aggregates stale; the repair pass
//! climbs from every touched element, electing a unique claimer per shared
//! ancestor through a CAS on `update_level`, then recomputes top-down so
//! each affected node is folded exactly once.

use std::sync::atomic::Ordering;

use rayon::prelude::*;

use crate::aggregate::Aggregation;
use crate::list::arena::AugmentedList;
use crate::list::node::{LEVEL_CLEAR, NIL};

/// Below this level the top-down recomputation stops forking.
const SEQUENTIAL_UPDATE_LEVEL: usize = 6;

impl<A: Aggregation> AugmentedList<A> {
    /// Recomputes the level-`level` aggregate of `id`: the fold of the
    /// level-`level - 1` values across the block rooted at `id`.
    fn fold_block(&self, id: usize, level: usize) -> A::Value {
        let mut sum = self.value(id, level - 1).clone();
        let mut curr = self.next(id, level - 1);
        while curr != NIL && self.height(curr) < level + 1 {
            sum = A::combine(&sum, self.value(curr, level - 1));
            curr = self.next(curr, level - 1);
        }
        sum
    }

    /// Assigns `new_value` to `id` and refolds every ancestor block up to
    /// the top of the list.
    pub(crate) fn update(&self, id: usize, new_value: A::Value) {
        let mut id = id;
        let mut value = new_value;
        let mut level = 0;
        loop {
            self.set_value(id, level, value);
            let Some(parent) = self.find_left_parent(id, level) else {
                return;
            };
            value = self.fold_block(parent, level + 1);
            id = parent;
            level += 1;
        }
    }

    /// Writes `new_values` (when given) to the elements' leaf level, then
    /// repairs all stale ancestors.
    ///
    /// With `new_values` absent this is the structural repair pass: each
    /// element climbs its left-parent chain, claiming ancestors via the
    /// `update_level` CAS. The first execution to reach an ancestor owns the
    /// climb above it; latecomers lower the claim with `fetch_min` and stop.
    /// Claimers that reach a node with no left parent record it, and the
    /// recorded tops are recomputed top-down in parallel.
    pub(crate) fn batch_update(&self, elements: &[usize], new_values: Option<&[A::Value]>) {
        if let Some(values) = new_values {
            elements
                .par_iter()
                .zip(values.par_iter())
                .for_each(|(&id, value)| self.set_value(id, 0, value.clone()));
        }

        let top_nodes: Vec<usize> = elements
            .par_iter()
            .filter_map(|&element| {
                let mut curr = element;
                let mut level = 0;
                loop {
                    let node = self.node(curr);
                    let claimed = node.update_level.compare_exchange(
                        LEVEL_CLEAR,
                        level,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    );
                    if claimed.is_err() {
                        // Another execution shares this ancestor and walks on.
                        node.update_level.fetch_min(level, Ordering::AcqRel);
                        break None;
                    }
                    level = node.height() - 1;
                    match self.find_left_parent(curr, level) {
                        None => break Some(curr),
                        Some(parent) => {
                            curr = parent;
                            level += 1;
                        }
                    }
                }
            })
            .collect();

        top_nodes
            .par_iter()
            .for_each(|&top| self.update_top_down(top, self.height(top) - 1));
    }

    /// Recomputes the aggregates under `id`'s level-`level` block and clears
    /// the claim when the node's top level has been handled.
    fn update_top_down(&self, id: usize, level: usize) {
        if level <= SEQUENTIAL_UPDATE_LEVEL {
            self.update_top_down_sequential(id, level);
            return;
        }

        self.update_block(id, level);

        let sum = self.fold_block(id, level);
        self.set_value(id, level, sum);
        if self.height(id) == level + 1 {
            self.node(id).update_level.store(LEVEL_CLEAR, Ordering::Release);
        }
    }

    /// Forks across the level-`level` block: one branch walks the chain,
    /// the other descends into the current member.
    fn update_block(&self, curr: usize, level: usize) {
        let pending = self.node(curr).update_level.load(Ordering::Acquire) < level;
        let chain = {
            let next = self.next(curr, level - 1);
            (next != NIL && self.height(next) < level + 1).then_some(next)
        };
        match (pending, chain) {
            (true, Some(next)) => {
                rayon::join(
                    || self.update_block(next, level),
                    || self.update_top_down(curr, level - 1),
                );
            }
            (true, None) => self.update_top_down(curr, level - 1),
            (false, Some(next)) => self.update_block(next, level),
            (false, None) => {}
        }
    }

    fn update_top_down_sequential(&self, id: usize, level: usize) {
        if level == 0 {
            if self.height(id) == 1 {
                self.node(id).update_level.store(LEVEL_CLEAR, Ordering::Release);
            }
            return;
        }

        if self.node(id).update_level.load(Ordering::Acquire) < level {
            self.update_top_down_sequential(id, level - 1);
        }
        let mut sum = self.value(id, level - 1).clone();
        let mut curr = self.next(id, level - 1);
        while curr != NIL && self.height(curr) < level + 1 {
            if self.node(curr).update_level.load(Ordering::Acquire) < level {
                self.update_top_down_sequential(curr, level - 1);
            }
            sum = A::combine(&sum, self.value(curr, level - 1));
            curr = self.next(curr, level - 1);
        }
        self.set_value(id, level, sum);

        if self.height(id) == level + 1 {
            self.node(id).update_level.store(LEVEL_CLEAR, Ordering::Release);
        }
    }

    /// Joins every `(left, right)` pair in parallel, then repairs the
    /// aggregates along all ancestors the stitches touched.
    pub(crate) fn batch_join(&self, joins: &[(usize, usize)]) {
        joins
            .par_iter()
            .for_each(|&(left, right)| self.join(left, right));
        let lefts: Vec<usize> = joins.iter().map(|&(left, _)| left).collect();
        self.batch_update(&lefts, None);
    }

    /// Splits after every element in parallel, then rebuilds the aggregates
    /// that lost their right half.
    ///
    /// The repair walks the left spine of each split point: climbing through
    /// the element's own levels writes the running prefix, stepping to a
    /// left neighbour folds its block in front. The `update_level` CAS
    /// breaks ties when the same split point appears twice in the batch.
    pub(crate) fn batch_split(&self, splits: &[usize]) {
        splits.par_iter().for_each(|&id| {
            self.split(id);
        });

        splits.par_iter().for_each(|&id| {
            let claimed = self.node(id).update_level.compare_exchange(
                LEVEL_CLEAR,
                0,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            if claimed.is_err() {
                return;
            }
            let mut sum = self.value(id, 0).clone();
            let mut curr = id;
            let mut level = 0;
            loop {
                if level + 1 < self.height(curr) {
                    level += 1;
                    self.set_value(curr, level, sum.clone());
                } else {
                    let prev = self.prev(curr, level);
                    if prev == NIL {
                        break;
                    }
                    curr = prev;
                    sum = A::combine(self.value(curr, level), &sum);
                }
            }
        });

        splits.par_iter().for_each(|&id| {
            self.node(id).update_level.store(LEVEL_CLEAR, Ordering::Release);
        });
    }

    /// Folds the aggregation over the whole list containing `id`, anchored
    /// at the representative.
    pub(crate) fn aggregate(&self, id: usize) -> A::Value {
        let root = self.find_representative(id);
        let mut level = self.height(root) - 1;
        let mut sum = self.value(root, level).clone();
        let mut curr = self.next(root, level);
        while curr != NIL && curr != root {
            sum = A::combine(&sum, self.value(curr, level));
            curr = self.next(curr, level);
        }
        if curr == NIL {
            // Acyclic list: fold the prefix left of the representative by a
            // symmetric descent.
            let mut curr = root;
            'descend: loop {
                while self.prev(curr, level) == NIL {
                    if level == 0 {
                        break 'descend;
                    }
                    level -= 1;
                }
                loop {
                    let prev = self.prev(curr, level);
                    if prev == NIL {
                        break;
                    }
                    curr = prev;
                    sum = A::combine(self.value(curr, level), &sum);
                }
            }
        }
        sum
    }

    /// Folds the aggregation over `[left, right]` inclusive, in list order.
    ///
    /// `left` must precede `right` in their shared list. Pure: safe to run
    /// concurrently with other queries, but not with structural mutation.
    pub(crate) fn subsequence_aggregate(&self, left: usize, right: usize) -> A::Value {
        let mut left = left;
        let mut right = right;
        let mut left_acc: Option<A::Value> = None;
        let mut right_acc = self.value(right, 0).clone();
        while left != right {
            let level = self.height(left).min(self.height(right)) - 1;
            if level == self.height(left) - 1 {
                let block = self.value(left, level);
                left_acc = Some(match left_acc {
                    Some(acc) => A::combine(&acc, block),
                    None => block.clone(),
                });
                left = self.next(left, level);
            } else {
                right = self.prev(right, level);
                right_acc = A::combine(self.value(right, level), &right_acc);
            }
        }
        match left_acc {
            Some(acc) => A::combine(&acc, &right_acc),
            None => right_acc,
        }
    }
}
