//! The immutable turtle.
//!
//! A [`Turtle`] is a value: position, heading, pen state, the eagerly
//! accumulated command list, and a set of named snapshot stacks. Every
//! drawing call consumes the turtle and returns the next value; there is no
//! hidden mutation and no sharing between instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tabkit_core::error::{TurtleError, TurtleResult};

use crate::geom::{
    normalize_angle_deg, rotate_point, tangent_intersection, Point, GEOM_EPSILON,
};
use crate::path::{Path, PathCommand};

/// How a curve endpoint's control point is placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Speed {
    /// Intersect the tangent lines of the two endpoints.
    Auto,
    /// Offset the control point this far along the endpoint's tangent.
    Value(f64),
}

impl Default for Speed {
    fn default() -> Self {
        Self::Auto
    }
}

/// Control-point placement for [`Turtle::curve_to`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveOptions {
    pub start_speed: Speed,
    pub target_speed: Speed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
struct SavedState {
    position: Option<Point>,
    heading_deg: Option<f64>,
    pen_down: Option<bool>,
}

/// An immutable 2D pen.
///
/// Headings are degrees counter-clockwise from the positive X axis;
/// `right` turns decrease the heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    position: Point,
    heading_deg: f64,
    pen_down: bool,
    commands: Vec<PathCommand>,
    stacks: BTreeMap<String, Vec<SavedState>>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// A turtle at the origin, heading along +X, pen down.
    pub fn new() -> Self {
        Self::at(Point::default(), 0.0)
    }

    /// A turtle at an arbitrary start pose, pen down.
    pub fn at(position: Point, heading_deg: f64) -> Self {
        Self {
            position,
            heading_deg: normalize_angle_deg(heading_deg),
            pen_down: true,
            commands: Vec::new(),
            stacks: BTreeMap::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// The commands accumulated so far.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Freezes the accumulated commands into a [`Path`].
    ///
    /// This is the explicit build step: all geometry is already computed,
    /// only the external hand-off happens here.
    pub fn into_path(self) -> Path {
        Path::new(self.commands, self.position, self.heading_deg, self.pen_down)
    }

    // --- motion ---------------------------------------------------------

    /// Moves `distance` along the heading, drawing if the pen is down.
    pub fn forward(self, distance: f64) -> Self {
        let to = self.position.advanced(self.heading_deg, distance);
        self.travel(to)
    }

    /// Moves backwards without turning.
    pub fn back(self, distance: f64) -> Self {
        self.forward(-distance)
    }

    /// Translates perpendicular to the heading without turning.
    pub fn strafe_right(self, distance: f64) -> Self {
        let to = self.position.advanced(self.heading_deg - 90.0, distance);
        self.travel(to)
    }

    /// Translates perpendicular to the heading without turning.
    pub fn strafe_left(self, distance: f64) -> Self {
        self.strafe_right(-distance)
    }

    /// Pure rotation to the right; no command is emitted.
    pub fn right(mut self, angle_deg: f64) -> Self {
        self.heading_deg = normalize_angle_deg(self.heading_deg - angle_deg);
        self
    }

    /// Pure rotation to the left; no command is emitted.
    pub fn left(self, angle_deg: f64) -> Self {
        self.right(-angle_deg)
    }

    /// Draws a straight line to `to` (honoring the pen).
    pub fn go_to(self, to: Point) -> Self {
        self.travel(to)
    }

    /// Repositions to `to` without drawing; the pen state is untouched.
    pub fn jump_to(mut self, to: Point) -> Self {
        if !to.approx_eq(&self.position, GEOM_EPSILON) {
            self.commands.push(PathCommand::MoveTo { to });
            self.position = to;
        }
        self
    }

    /// Raises the pen.
    pub fn pen_up(mut self) -> Self {
        self.pen_down = false;
        self
    }

    /// Lowers the pen.
    pub fn pen_down(mut self) -> Self {
        self.pen_down = true;
        self
    }

    fn travel(mut self, to: Point) -> Self {
        if to.approx_eq(&self.position, GEOM_EPSILON) {
            return self;
        }
        let command = if self.pen_down {
            PathCommand::LineTo { to }
        } else {
            PathCommand::MoveTo { to }
        };
        self.commands.push(command);
        self.position = to;
        self
    }

    // --- arcs -----------------------------------------------------------

    /// Draws a circular arc curving to the right.
    ///
    /// `|angle_deg| >= 360` first draws one full circle as two consecutive
    /// 180-degree arcs inside a saved-and-restored sub-branch (a one-command
    /// full turn has no unambiguous representation), then draws the signed
    /// remainder.
    pub fn arc_right(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_signed(-angle_deg, radius)
    }

    /// Draws a circular arc curving to the left.
    pub fn arc_left(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_signed(angle_deg, radius)
    }

    fn arc_signed(self, angle_ccw_deg: f64, radius: f64) -> Self {
        if angle_ccw_deg.abs() < GEOM_EPSILON {
            return self;
        }
        if angle_ccw_deg.abs() >= 360.0 {
            let half = 180.0_f64.copysign(angle_ccw_deg);
            let circled = self.branch(|t| t.arc_segment(half, radius).arc_segment(half, radius));
            let remainder = angle_ccw_deg % 360.0;
            if remainder.abs() < GEOM_EPSILON {
                return circled;
            }
            return circled.arc_segment(remainder, radius);
        }
        self.arc_segment(angle_ccw_deg, radius)
    }

    /// One arc command; `|angle_ccw_deg|` must be below 360.
    fn arc_segment(mut self, angle_ccw_deg: f64, radius: f64) -> Self {
        if radius.abs() < GEOM_EPSILON {
            // Degenerate arc: pure rotation.
            return self.left(angle_ccw_deg);
        }
        let side = 90.0_f64.copysign(angle_ccw_deg);
        let center = self.position.advanced(self.heading_deg + side, radius);
        let to = rotate_point(self.position, center, angle_ccw_deg);

        if self.pen_down {
            self.commands.push(PathCommand::Arc {
                rx: radius,
                ry: radius,
                x_rotation_deg: 0.0,
                large_arc: angle_ccw_deg.abs() > 180.0,
                sweep: angle_ccw_deg < 0.0,
                to,
            });
        } else if !to.approx_eq(&self.position, GEOM_EPSILON) {
            self.commands.push(PathCommand::MoveTo { to });
        }
        self.position = to;
        self.heading_deg = normalize_angle_deg(self.heading_deg + angle_ccw_deg);
        self
    }

    // --- curves ---------------------------------------------------------

    /// Draws a Bézier curve to another turtle's pose and adopts it.
    ///
    /// Each endpoint's control point is either an explicit forward/back
    /// offset along that endpoint's tangent, or `Speed::Auto`: the
    /// intersection of the two tangent lines, falling back to the endpoint
    /// itself when the tangents are parallel. Two `Auto` ends share the one
    /// intersection point and emit a quadratic curve.
    pub fn curve_to(mut self, target: &Turtle, options: &CurveOptions) -> Self {
        let to = target.position;
        if self.pen_down {
            let command = match (options.start_speed, options.target_speed) {
                (Speed::Auto, Speed::Auto) => {
                    let ctrl = self.auto_control(target, self.position);
                    PathCommand::Quadratic { ctrl, to }
                }
                (start, target_speed) => {
                    let ctrl1 = match start {
                        Speed::Value(speed) => self.position.advanced(self.heading_deg, speed),
                        Speed::Auto => self.auto_control(target, self.position),
                    };
                    let ctrl2 = match target_speed {
                        Speed::Value(speed) => to.advanced(target.heading_deg, -speed),
                        Speed::Auto => self.auto_control(target, to),
                    };
                    PathCommand::Cubic { ctrl1, ctrl2, to }
                }
            };
            self.commands.push(command);
        } else if !to.approx_eq(&self.position, GEOM_EPSILON) {
            self.commands.push(PathCommand::MoveTo { to });
        }
        self.position = to;
        self.heading_deg = target.heading_deg;
        self
    }

    fn auto_control(&self, target: &Turtle, fallback: Point) -> Point {
        tangent_intersection(
            self.position,
            self.heading_deg,
            target.position,
            target.heading_deg,
        )
        .unwrap_or(fallback)
    }

    // --- elliptical helpers ---------------------------------------------

    /// Quarter ellipse to the right: advances `forward` along the heading
    /// and `side` to the right, ending turned 90 degrees right.
    pub fn round_corner_right(self, forward: f64, side: f64) -> Self {
        self.round_corner(forward, side, -1.0)
    }

    /// Quarter ellipse to the left.
    pub fn round_corner_left(self, forward: f64, side: f64) -> Self {
        self.round_corner(forward, side, 1.0)
    }

    fn round_corner(mut self, forward: f64, side: f64, turn_sign: f64) -> Self {
        let rotation = self.heading_deg;
        let to = self
            .position
            .advanced(self.heading_deg, forward)
            .advanced(self.heading_deg + turn_sign * 90.0, side);
        self = self.place_arc(forward, side, rotation, turn_sign, to);
        self.heading_deg = normalize_angle_deg(self.heading_deg + turn_sign * 90.0);
        self
    }

    /// Half ellipse bulging `forward` ahead, ending `2 * side` to the right
    /// with the heading reversed.
    pub fn half_ellipse_right(self, forward: f64, side: f64) -> Self {
        self.half_ellipse(forward, side, -1.0)
    }

    /// Half ellipse bulging `forward` ahead, ending `2 * side` to the left
    /// with the heading reversed.
    pub fn half_ellipse_left(self, forward: f64, side: f64) -> Self {
        self.half_ellipse(forward, side, 1.0)
    }

    fn half_ellipse(mut self, forward: f64, side: f64, turn_sign: f64) -> Self {
        let rotation = self.heading_deg;
        let to = self
            .position
            .advanced(self.heading_deg + turn_sign * 90.0, 2.0 * side);
        self = self.place_arc(forward, side, rotation, turn_sign, to);
        self.heading_deg = normalize_angle_deg(self.heading_deg + turn_sign * 180.0);
        self
    }

    fn place_arc(mut self, rx: f64, ry: f64, rotation: f64, turn_sign: f64, to: Point) -> Self {
        if self.pen_down {
            self.commands.push(PathCommand::Arc {
                rx,
                ry,
                x_rotation_deg: rotation,
                large_arc: false,
                sweep: turn_sign < 0.0,
                to,
            });
        } else if !to.approx_eq(&self.position, GEOM_EPSILON) {
            self.commands.push(PathCommand::MoveTo { to });
        }
        self.position = to;
        self
    }

    // --- control flow ---------------------------------------------------

    /// Runs `f` on this turtle and keeps whatever it drew, then restores
    /// position, heading, pen state, and the snapshot stacks to their
    /// values from before the call.
    pub fn branch<F>(self, f: F) -> Self
    where
        F: FnOnce(Turtle) -> Turtle,
    {
        let position = self.position;
        let heading_deg = self.heading_deg;
        let pen_down = self.pen_down;
        let stacks = self.stacks.clone();

        let mut branched = f(self);
        let drifted = !branched.position.approx_eq(&position, GEOM_EPSILON);
        branched.position = position;
        branched.heading_deg = heading_deg;
        branched.pen_down = pen_down;
        branched.stacks = stacks;
        if drifted {
            branched.commands.push(PathCommand::MoveTo { to: position });
        }
        branched
    }

    /// Applies `f` `count` times, threading the iteration index.
    pub fn repeat<F>(self, count: usize, mut f: F) -> Self
    where
        F: FnMut(Turtle, usize) -> Turtle,
    {
        let mut turtle = self;
        for i in 0..count {
            turtle = f(turtle, i);
        }
        turtle
    }

    /// Applies `f` once per item, threading the item through.
    pub fn repeat_over<T, I, F>(self, items: I, mut f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(Turtle, T) -> Turtle,
    {
        let mut turtle = self;
        for item in items {
            turtle = f(turtle, item);
        }
        turtle
    }

    /// Like [`Turtle::repeat`], but wraps every iteration in [`Turtle::branch`].
    pub fn branches<F>(self, count: usize, mut f: F) -> Self
    where
        F: FnMut(Turtle, usize) -> Turtle,
    {
        let mut turtle = self;
        for i in 0..count {
            turtle = turtle.branch(|t| f(t, i));
        }
        turtle
    }

    // --- snapshot stacks ------------------------------------------------

    /// Snapshots the full state onto the named stack.
    pub fn push_state(self, key: impl Into<String>) -> Self {
        let frame = SavedState {
            position: Some(self.position),
            heading_deg: Some(self.heading_deg),
            pen_down: Some(self.pen_down),
        };
        self.save(key, frame)
    }

    /// Snapshots the position only.
    pub fn push_pos(self, key: impl Into<String>) -> Self {
        let frame = SavedState {
            position: Some(self.position),
            ..SavedState::default()
        };
        self.save(key, frame)
    }

    /// Snapshots the heading only.
    pub fn push_angle(self, key: impl Into<String>) -> Self {
        let frame = SavedState {
            heading_deg: Some(self.heading_deg),
            ..SavedState::default()
        };
        self.save(key, frame)
    }

    /// Snapshots position and heading.
    pub fn push_pos_angle(self, key: impl Into<String>) -> Self {
        let frame = SavedState {
            position: Some(self.position),
            heading_deg: Some(self.heading_deg),
            ..SavedState::default()
        };
        self.save(key, frame)
    }

    /// Snapshots the pen state only.
    pub fn push_pen(self, key: impl Into<String>) -> Self {
        let frame = SavedState {
            pen_down: Some(self.pen_down),
            ..SavedState::default()
        };
        self.save(key, frame)
    }

    /// Restores the top snapshot of the named stack without removing it.
    pub fn peek(self, key: &str) -> TurtleResult<Self> {
        let frame = self
            .stacks
            .get(key)
            .and_then(|stack| stack.last())
            .copied()
            .ok_or_else(|| TurtleError::EmptyStack {
                key: key.to_string(),
            })?;
        Ok(self.apply(frame))
    }

    /// Restores and removes the top snapshot of the named stack.
    pub fn pop(mut self, key: &str) -> TurtleResult<Self> {
        let frame = self
            .stacks
            .get_mut(key)
            .and_then(|stack| stack.pop())
            .ok_or_else(|| TurtleError::EmptyStack {
                key: key.to_string(),
            })?;
        Ok(self.apply(frame))
    }

    fn save(mut self, key: impl Into<String>, frame: SavedState) -> Self {
        self.stacks.entry(key.into()).or_default().push(frame);
        self
    }

    fn apply(mut self, frame: SavedState) -> Self {
        if let Some(position) = frame.position {
            self = self.jump_to(position);
        }
        if let Some(heading_deg) = frame.heading_deg {
            self.heading_deg = heading_deg;
        }
        if let Some(pen_down) = frame.pen_down {
            self.pen_down = pen_down;
        }
        self
    }
}
