//! Error handling for TabKit
//!
//! Provides the error types for all layers of the geometry pipeline:
//! - Pattern errors (tab/slot pattern construction)
//! - Turtle errors (path engine state)
//! - Joint errors (tab/slot edge geometry)
//! - Face errors (dual-level face building and closing)
//! - Solver errors (root finding)
//!
//! All error types use `thiserror` for ergonomic error handling. Every
//! failure is deterministic and raised at the point of detection; callers
//! are expected to fix the input and rebuild rather than retry.

use thiserror::Error;

/// Pattern error type
///
/// Represents errors raised while constructing tab/slot interlock patterns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// A negative segment length was requested.
    #[error("Invalid segment length {length}: lengths must not be negative")]
    InvalidLength {
        /// The offending length.
        length: f64,
    },

    /// The derived tooth/gap layout cannot be satisfied.
    #[error("Unsatisfiable tab layout: {tabs} tabs would require {gaps} gaps")]
    InvalidCount {
        /// The number of teeth in the layout.
        tabs: usize,
        /// The derived (negative or inconsistent) gap count.
        gaps: i64,
    },
}

/// Turtle error type
///
/// Represents errors raised by the immutable turtle path engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurtleError {
    /// `peek` or `pop` was called on a stack with nothing saved.
    #[error("State stack '{key}' is empty")]
    EmptyStack {
        /// The stack key that was queried.
        key: String,
    },
}

/// Joint error type
///
/// Represents errors raised while turning a pattern plus kerf correction
/// into concrete edge geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JointError {
    /// Kerf correction plus corner radii exceed the available straight span.
    #[error(
        "Negative edge at {position:.3}: kerf and corner radii exceed the straight span by {deficit:.3}"
    )]
    NegativeEdge {
        /// Position along the edge (before kerf shifting) where the span ran out.
        position: f64,
        /// How far the remaining straight length went below zero.
        deficit: f64,
    },
}

/// Face error type
///
/// Represents errors raised by the dual-level face builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FaceError {
    /// Two adjacent segments declare conflicting required levels.
    #[error("Conflicting required levels between {earlier} (requires {earlier_level}) and {later} (requires {later_level})")]
    LevelConflict {
        /// Description of the earlier neighbor.
        earlier: String,
        /// Level required by the earlier neighbor.
        earlier_level: String,
        /// Description of the later neighbor.
        later: String,
        /// Level required by the later neighbor.
        later_level: String,
    },

    /// The traced outline does not return to its start pose within tolerance.
    #[error(
        "Face is not closed: ended at ({observed_x:.6}, {observed_y:.6}) heading {observed_heading:.6}, expected ({expected_x:.6}, {expected_y:.6}) heading {expected_heading:.6}"
    )]
    NotClosed {
        expected_x: f64,
        expected_y: f64,
        expected_heading: f64,
        observed_x: f64,
        observed_y: f64,
        observed_heading: f64,
    },
}

/// Solver error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The search interval was exhausted without bracketing a sign change.
    #[error(
        "No zero found in [{min}, {max}]: f({min}) = {f_min}, f({max}) = {f_max}"
    )]
    NoZeroFound {
        /// Lower end of the searched interval.
        min: f64,
        /// Upper end of the searched interval.
        max: f64,
        /// Function value at the lower end.
        f_min: f64,
        /// Function value at the upper end.
        f_max: f64,
    },
}

/// Main error type for TabKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Pattern construction error
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Turtle state error
    #[error(transparent)]
    Turtle(#[from] TurtleError),

    /// Joint geometry error
    #[error(transparent)]
    Joint(#[from] JointError),

    /// Face building error
    #[error(transparent)]
    Face(#[from] FaceError),

    /// Root finder error
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a pattern error
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, Error::Pattern(_))
    }

    /// Check if this is a joint geometry error
    pub fn is_joint_error(&self) -> bool {
        matches!(self, Error::Joint(_))
    }

    /// Check if this is a face building error
    pub fn is_face_error(&self) -> bool {
        matches!(self, Error::Face(_))
    }

    /// Check if this error means the face outline failed its closing check
    pub fn is_not_closed(&self) -> bool {
        matches!(self, Error::Face(FaceError::NotClosed { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for pattern construction.
pub type PatternResult<T> = std::result::Result<T, PatternError>;

/// Result type alias for turtle operations.
pub type TurtleResult<T> = std::result::Result<T, TurtleError>;

/// Result type alias for joint geometry.
pub type JointResult<T> = std::result::Result<T, JointError>;

/// Result type alias for the root finder.
pub type SolverResult<T> = std::result::Result<T, SolverError>;
