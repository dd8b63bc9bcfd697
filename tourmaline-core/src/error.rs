//! Error types for the tourmaline core library.
//!
//! Construction is the only fallible surface: the structural operations
//! treat their preconditions as caller obligations and do not validate.

use std::fmt;

use thiserror::Error;

/// Stable codes describing [`ForestError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ForestErrorCode {
    /// A forest must contain at least one vertex.
    EmptyVertexSet,
    /// The requested vertex count overflows the element arena.
    VertexCountOverflow,
}

impl ForestErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyVertexSet => "FOREST_EMPTY_VERTEX_SET",
            Self::VertexCountOverflow => "FOREST_VERTEX_COUNT_OVERFLOW",
        }
    }
}

impl fmt::Display for ForestErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when constructing an
/// [`EulerTourForest`](crate::EulerTourForest).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ForestError {
    /// A forest must contain at least one vertex.
    #[error("a forest requires at least one vertex")]
    EmptyVertexSet,
    /// The requested vertex count overflows the element arena, which holds
    /// `3n - 2` slots.
    #[error("vertex count {got} overflows the element arena")]
    VertexCountOverflow { got: usize },
}

impl ForestError {
    /// Retrieve the stable [`ForestErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ForestErrorCode {
        match self {
            Self::EmptyVertexSet => ForestErrorCode::EmptyVertexSet,
            Self::VertexCountOverflow { .. } => ForestErrorCode::VertexCountOverflow,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ForestError>;
