//! Tourmaline core library: batch-parallel Euler tour forests.
//!
//! An [`EulerTourForest`] maintains an undirected forest over a fixed
//! vertex set under edge insertions and deletions, one at a time or in
//! parallel batches, together with an associative aggregation over
//! per-vertex values. Connectivity queries compare skip-list
//! representatives; batches are the unit of atomicity, with all internal
//! parallelism finished before a call returns.

mod aggregate;
mod builder;
mod error;
mod forest;
mod list;
mod rng;

pub use crate::{
    aggregate::{Aggregation, Sum},
    builder::ForestBuilder,
    error::{ForestError, ForestErrorCode, Result},
    forest::EulerTourForest,
};
