//! Error types for polygon operations.

use thiserror::Error;

/// Errors that can occur while building, editing or combining polygons.
///
/// Geometric ambiguity (self-intersection, wrong orientation, bad nesting) is
/// never an error; it is resolved by regularization. Every variant names the
/// operation or entity it concerns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyError {
    /// A vertex, edge or contour index is outside the valid range.
    #[error("{operation}: {entity} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Kind of entity addressed (`"vertex"`, `"edge"`, `"contour"`).
        entity: &'static str,
        /// The offending index.
        index: usize,
        /// Number of entities of that kind.
        len: usize,
        /// Operation that received the index.
        operation: &'static str,
    },

    /// The operation needs at least one contour.
    #[error("{operation}: polygon is empty")]
    EmptyPolygon {
        /// Operation that received the empty polygon.
        operation: &'static str,
    },

    /// Structurally invalid construction input.
    #[error("irregular input: {reason}")]
    IrregularInput {
        /// What is wrong with the input.
        reason: String,
    },

    /// The operation requires a regularized polygon.
    #[error("{operation}: polygon is not regularized")]
    NotRegularized {
        /// Operation that was refused.
        operation: &'static str,
    },

    /// The caller's abort check fired.
    #[error("{operation}: cancelled")]
    Cancelled {
        /// Operation that was interrupted.
        operation: &'static str,
    },

    /// A coordinate or accumulated angle is outside the supported range.
    #[error("numeric overflow: {value} exceeds the supported range")]
    NumericOverflow {
        /// The offending value.
        value: f64,
    },

    /// An argument is outside its valid domain.
    #[error("{operation}: invalid argument: {reason}")]
    InvalidArgument {
        /// Operation that received the argument.
        operation: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// An in-place edit would break regularity; the polygon is unchanged.
    #[error("{operation}: edit at index {index} would break regularity")]
    RegularityViolation {
        /// Operation that was refused.
        operation: &'static str,
        /// Vertex or edge index of the refused edit.
        index: usize,
    },

    /// Boundary tracing produced a hole without an enclosing outer contour.
    #[error("{operation}: could not resolve contour nesting")]
    UnresolvedTopology {
        /// Operation that failed.
        operation: &'static str,
    },

    /// A binary polygon record could not be decoded.
    #[error("decode error: {reason}")]
    Decode {
        /// What went wrong.
        reason: String,
    },
}

/// Result type for polygon operations.
pub type Result<T> = std::result::Result<T, PolyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_operation() {
        let e = PolyError::IndexOutOfRange {
            entity: "vertex",
            index: 7,
            len: 4,
            operation: "delete_vertex",
        };
        assert_eq!(e.to_string(), "delete_vertex: vertex index 7 out of range (len 4)");

        let e = PolyError::Cancelled { operation: "union" };
        assert_eq!(e.to_string(), "union: cancelled");
    }
}
