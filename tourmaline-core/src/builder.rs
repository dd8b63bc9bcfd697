//! Builder for configuring and constructing forests.

use crate::aggregate::Aggregation;
use crate::error::{ForestError, Result};
use crate::forest::EulerTourForest;

/// Configures and constructs [`EulerTourForest`] instances.
///
/// The default value seeds every vertex and is the contribution of each
/// edge occurrence to tree aggregates; pick the aggregation identity to
/// make edges weightless. The seed determines every skip-list height and
/// every batch-cut sampling decision, so runs with equal seeds build
/// identical structures.
///
/// # Examples
/// ```
/// use tourmaline_core::{ForestBuilder, Sum};
///
/// let forest = ForestBuilder::<Sum<i64>>::new(8, 1)
///     .with_seed(42)
///     .build()
///     .expect("vertex count is valid");
/// assert_eq!(forest.num_vertices(), 8);
/// assert_eq!(forest.tree_aggregate(3), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ForestBuilder<A: Aggregation> {
    num_vertices: usize,
    default_value: A::Value,
    seed: u64,
}

impl<A: Aggregation> ForestBuilder<A> {
    /// Creates a builder for a forest over `{0, …, num_vertices - 1}` with
    /// `default_value` assigned to every element.
    #[must_use]
    pub fn new(num_vertices: usize, default_value: A::Value) -> Self {
        Self {
            num_vertices,
            default_value,
            seed: 0x5EED_CAFE,
        }
    }

    /// Seeds the structure's randomness to make runs reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured vertex count.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Validates the configuration and constructs the forest of singleton
    /// trees.
    ///
    /// # Errors
    /// Returns [`ForestError::EmptyVertexSet`] for zero vertices and
    /// [`ForestError::VertexCountOverflow`] when the `3n - 2` element arena
    /// would overflow `usize`.
    pub fn build(self) -> Result<EulerTourForest<A>> {
        if self.num_vertices == 0 {
            return Err(ForestError::EmptyVertexSet);
        }
        if self.num_vertices.checked_mul(3).is_none() {
            return Err(ForestError::VertexCountOverflow {
                got: self.num_vertices,
            });
        }
        Ok(EulerTourForest::with_vertices(
            self.num_vertices,
            self.default_value,
            self.seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Sum;
    use rstest::rstest;

    #[rstest]
    fn rejects_an_empty_vertex_set() {
        let err = ForestBuilder::<Sum<i64>>::new(0, 1)
            .build()
            .expect_err("zero vertices must be rejected");
        assert_eq!(err, ForestError::EmptyVertexSet);
    }

    #[rstest]
    fn builds_singletons_with_the_default_value() {
        let forest = ForestBuilder::<Sum<i64>>::new(3, 5)
            .with_seed(1)
            .build()
            .expect("vertex count is valid");
        assert_eq!(forest.num_vertices(), 3);
        for v in 0..3 {
            assert_eq!(forest.value(v), 5);
            assert_eq!(forest.tree_aggregate(v), 5);
        }
    }
}
