//! Path command model.
//!
//! The ordered command list is the sole contract handed to serializers and
//! renderers outside this crate. Commands accumulate eagerly inside the
//! turtle; [`crate::Turtle::into_path`] is the explicit build step that
//! freezes them together with the final pose.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// A single drawable path command.
///
/// Arc semantics follow the radius + rotation + sweep convention:
/// `x_rotation_deg` orients the ellipse's first axis (`rx`), `sweep = true`
/// means the arc bends clockwise (a right turn with counter-clockwise
/// headings), and `large_arc` selects the longer of the two candidate
/// sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Reposition the pen without drawing.
    MoveTo { to: Point },
    /// Straight segment.
    LineTo { to: Point },
    /// Circular or elliptical arc.
    Arc {
        rx: f64,
        ry: f64,
        x_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    /// Quadratic Bézier curve.
    Quadratic { ctrl: Point, to: Point },
    /// Cubic Bézier curve.
    Cubic { ctrl1: Point, ctrl2: Point, to: Point },
}

impl PathCommand {
    /// The point the pen stands on after this command.
    pub fn end_point(&self) -> Point {
        match self {
            PathCommand::MoveTo { to }
            | PathCommand::LineTo { to }
            | PathCommand::Arc { to, .. }
            | PathCommand::Quadratic { to, .. }
            | PathCommand::Cubic { to, .. } => *to,
        }
    }

    /// Whether this command deposits ink.
    pub fn is_drawing(&self) -> bool {
        !matches!(self, PathCommand::MoveTo { .. })
    }

    fn anchor_points(&self) -> Vec<Point> {
        match self {
            PathCommand::MoveTo { to } | PathCommand::LineTo { to } => vec![*to],
            PathCommand::Arc { to, .. } => vec![*to],
            PathCommand::Quadratic { ctrl, to } => vec![*ctrl, *to],
            PathCommand::Cubic { ctrl1, ctrl2, to } => vec![*ctrl1, *ctrl2, *to],
        }
    }
}

/// A finished path: the command list plus the pen's final pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
    end_position: Point,
    end_heading_deg: f64,
    pen_down: bool,
}

impl Path {
    pub(crate) fn new(
        commands: Vec<PathCommand>,
        end_position: Point,
        end_heading_deg: f64,
        pen_down: bool,
    ) -> Self {
        Self {
            commands,
            end_position,
            end_heading_deg,
            pen_down,
        }
    }

    /// The ordered command list.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// The pen position after the last command.
    pub fn end_position(&self) -> Point {
        self.end_position
    }

    /// The pen heading after the last command, in degrees.
    pub fn end_heading_deg(&self) -> f64 {
        self.end_heading_deg
    }

    /// The pen state after the last command.
    pub fn pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bounding box over all command anchor points as
    /// `(min_x, min_y, max_x, max_y)`.
    ///
    /// Control points are included, so curves never escape the box; arc
    /// bulges between their endpoints are not sampled.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for command in &self.commands {
            for p in command.anchor_points() {
                bounds = Some(match bounds {
                    None => (p.x, p.y, p.x, p.y),
                    Some((min_x, min_y, max_x, max_y)) => (
                        min_x.min(p.x),
                        min_y.min(p.y),
                        max_x.max(p.x),
                        max_y.max(p.y),
                    ),
                });
            }
        }
        bounds
    }

    /// Returns the path rigidly shifted by the given deltas.
    pub fn translated(&self, dx: f64, dy: f64) -> Path {
        let shift = |p: Point| p.translated(dx, dy);
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo { to } => PathCommand::MoveTo { to: shift(to) },
                PathCommand::LineTo { to } => PathCommand::LineTo { to: shift(to) },
                PathCommand::Arc {
                    rx,
                    ry,
                    x_rotation_deg,
                    large_arc,
                    sweep,
                    to,
                } => PathCommand::Arc {
                    rx,
                    ry,
                    x_rotation_deg,
                    large_arc,
                    sweep,
                    to: shift(to),
                },
                PathCommand::Quadratic { ctrl, to } => PathCommand::Quadratic {
                    ctrl: shift(ctrl),
                    to: shift(to),
                },
                PathCommand::Cubic { ctrl1, ctrl2, to } => PathCommand::Cubic {
                    ctrl1: shift(ctrl1),
                    ctrl2: shift(ctrl2),
                    to: shift(to),
                },
            })
            .collect();
        Path {
            commands,
            end_position: shift(self.end_position),
            end_heading_deg: self.end_heading_deg,
            pen_down: self.pen_down,
        }
    }
}
