//! Tourmaline: batch-parallel Euler tour forests.
//!
//! This facade re-exports the [`tourmaline_core`] surface.
//!
//! # Examples
//! ```
//! use tourmaline::{ForestBuilder, Sum};
//!
//! let mut forest = ForestBuilder::<Sum<i64>>::new(3, 1)
//!     .build()
//!     .expect("vertex count is valid");
//! forest.link(0, 1);
//! assert!(forest.is_connected(0, 1));
//! ```

pub use tourmaline_core::{
    Aggregation, EulerTourForest, ForestBuilder, ForestError, ForestErrorCode, Result, Sum,
};
