//! Batch-parallel augmented skip list.
//!
//! Elements form doubly-linked lists at every level they reach; joins and
//! splits restitch boundaries cooperatively under CAS arbitration, and a
//! claiming protocol repairs the per-level aggregates after each structural
//! batch. Lists may be cyclic; the Euler tour layer keeps one cycle per
//! tree.

mod arena;
mod augment;
mod node;
mod structure;

pub(crate) use arena::AugmentedList;
pub(crate) use node::{MAX_HEIGHT, NIL};

#[cfg(test)]
mod tests;
