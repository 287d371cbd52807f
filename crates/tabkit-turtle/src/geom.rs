//! Plane geometry helpers for the turtle engine.
//!
//! Headings are degrees, measured counter-clockwise from the positive X
//! axis; turning right decreases the heading.

use serde::{Deserialize, Serialize};

/// Tolerance for degenerate-geometry checks.
pub const GEOM_EPSILON: f64 = 1e-9;

/// Represents a 2D point with X and Y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Returns this point shifted by the given deltas.
    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Returns this point advanced `distance` along `heading_deg`.
    pub fn advanced(&self, heading_deg: f64, distance: f64) -> Point {
        let (dx, dy) = heading_vector(heading_deg);
        Point::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Whether both coordinates are within `tolerance` of the other point's.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

/// Unit vector pointing along a heading.
pub fn heading_vector(heading_deg: f64) -> (f64, f64) {
    let rad = heading_deg.to_radians();
    (rad.cos(), rad.sin())
}

/// Rotates `p` around `center` by `angle_deg` (counter-clockwise).
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < GEOM_EPSILON {
        return p;
    }
    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos_a - dy * sin_a,
        y: center.y + dx * sin_a + dy * cos_a,
    }
}

/// Normalizes an angle into `[0, 360)`.
pub fn normalize_angle_deg(angle_deg: f64) -> f64 {
    let normalized = angle_deg.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Smallest absolute difference between two headings, in degrees.
pub fn heading_difference_deg(a: f64, b: f64) -> f64 {
    let diff = normalize_angle_deg(a - b);
    diff.min(360.0 - diff)
}

/// Intersection of the two tangent lines through `(p1, heading1)` and
/// `(p2, heading2)`, computed in homogeneous coordinates.
///
/// Returns `None` when the lines are parallel (determinant ~ 0).
pub fn tangent_intersection(
    p1: Point,
    heading1_deg: f64,
    p2: Point,
    heading2_deg: f64,
) -> Option<Point> {
    let (dx1, dy1) = heading_vector(heading1_deg);
    let (dx2, dy2) = heading_vector(heading2_deg);

    // Line through a point with a direction: l = (-dy, dx, x*dy - y*dx).
    let l1 = (-dy1, dx1, p1.x * dy1 - p1.y * dx1);
    let l2 = (-dy2, dx2, p2.x * dy2 - p2.y * dx2);

    // Intersection point is the cross product of the two lines.
    let w = l1.0 * l2.1 - l1.1 * l2.0;
    if w.abs() < GEOM_EPSILON {
        return None;
    }
    let x = l1.1 * l2.2 - l1.2 * l2.1;
    let y = l1.2 * l2.0 - l1.0 * l2.2;
    Some(Point::new(x / w, y / w))
}
