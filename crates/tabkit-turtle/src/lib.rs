//! # TabKit Turtle
//!
//! The immutable turtle-graphics path engine: plane geometry helpers, the
//! path-command model handed to external serializers, and the turtle value
//! itself with line/arc/curve primitives and control-flow combinators.

pub mod geom;
pub mod path;
pub mod turtle;

pub use geom::{
    heading_difference_deg, normalize_angle_deg, rotate_point, tangent_intersection, Point,
    GEOM_EPSILON,
};
pub use path::{Path, PathCommand};
pub use turtle::{CurveOptions, Speed, Turtle};
