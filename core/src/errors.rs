//! Error type shared by every fallible engine operation.

use thiserror::Error;

/// Result type returned by fallible engine routines.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error produced by the engine.
///
/// Every operation that returns one of these has left its inputs and the
/// session it was called on untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A neighbor offset string or offset vector could not be used.
    #[error("malformed neighbor offset {offset:?}: {reason}")]
    MalformedOffset {
        /// Offending offset, as written.
        offset: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A lattice topology name was not recognized.
    #[error("unknown topology {0:?}")]
    UnknownTopology(String),
    /// An axis name was not recognized.
    #[error("unknown axis {0:?}")]
    UnknownAxis(String),
    /// A shape was given no axes.
    #[error("shape must have at least one axis")]
    EmptyShape,
    /// A shape was given more axes than the engine supports.
    #[error("shape has {0} axes; at most 6 are supported")]
    TooManyAxes(usize),
    /// A shape was given a non-positive extent.
    #[error("extent along axis {axis} must be positive; got {extent}")]
    InvalidExtent {
        /// Axis with the bad extent.
        axis: crate::axis::Axis,
        /// The bad extent.
        extent: i64,
    },
    /// A rule number or rule descriptor was invalid.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    /// The session was asked to do something before it was set up.
    #[error("{0} is not initialized")]
    NotInitialized(&'static str),
    /// A seed density was not a probability.
    #[error("seed density must be between 0 and 1; got {0}")]
    InvalidDensity(f64),
    /// Two shapes (or a shape and a neighborhood) do not agree on their axes.
    #[error("axis mismatch: expected {expected}; got {got}")]
    AxisMismatch {
        /// What the receiving side required.
        expected: String,
        /// What it was given.
        got: String,
    },
    /// A snapshot does not hold the same number of cells as the shape it is
    /// being unpacked into.
    #[error("snapshot holds {snapshot_cells} cells but the shape holds {shape_cells}")]
    SnapshotSizeMismatch {
        /// Number of cells recorded in the snapshot.
        snapshot_cells: usize,
        /// Number of cells in the target shape.
        shape_cells: usize,
    },
    /// Nested cell data was ragged or empty.
    #[error("nested cells are ragged or empty")]
    RaggedCells,
}
