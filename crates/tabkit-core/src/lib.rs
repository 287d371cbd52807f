//! # TabKit Core
//!
//! Core types and utilities for TabKit: the error taxonomy, kerf units, the
//! tab/slot interlock pattern algebra, and the 1-D root finder used to
//! back-solve unknown distances in design scripts.

pub mod error;
pub mod pattern;
pub mod solver;
pub mod units;

pub use error::{
    Error, FaceError, JointError, PatternError, Result, SolverError, TurtleError,
};

pub use pattern::{
    DistributedSpec, InterlockPattern, PatternSegment, SlotsPattern, TabsPattern,
};

pub use solver::{solve_for_zero, SolveOptions};

pub use units::{Kerf, Side};
