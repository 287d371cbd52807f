//! Dual-level face builder.
//!
//! A face is one closed outline built by sequencing plain moves, turns, and
//! tabbed or slotted edges. The pen alternates between two parallel lines:
//! the base line the edge lengths are measured on, and the tab line offset
//! by the tooth protrusion. Levels live on the gaps between hop steps;
//! every hop bridges its two neighboring gaps, and transitions happen only
//! at hop boundaries. Drawing is deferred: builder calls accumulate steps,
//! and [`TabbedFace::close_face`] infers the level of every gap, replays
//! the steps, and validates that the outline returns to its start pose.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabkit_core::error::{Error, FaceError, Result};
use tabkit_core::pattern::{SlotsPattern, TabsPattern};
use tabkit_core::units::Side;
use tabkit_turtle::{heading_difference_deg, Path, Turtle};

use crate::interlock::{self, SlotsOptions, TabsOptions};
use crate::registry::{TabRegistry, TabsDef};

/// Offset-turn multipliers beyond this take the strafe maneuver instead.
const MAX_TURN_OFFSET_RATIO: f64 = 64.0;

/// Which of the two parallel offset lines the pen traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// The nominal edge line lengths are measured on.
    Base,
    /// The parallel line offset by the tooth protrusion.
    Tab,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Base => write!(f, "base"),
            Level::Tab => write!(f, "tab"),
        }
    }
}

/// A level preference declared by a hop at one of its boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPref {
    /// Must hold; two conflicting required preferences fail the face.
    Required(Level),
    /// Preferred when nothing required disagrees.
    Advisory(Level),
}

impl LevelPref {
    pub fn level(&self) -> Level {
        match self {
            LevelPref::Required(level) | LevelPref::Advisory(level) => *level,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, LevelPref::Required(_))
    }
}

/// Which physical level turn operations resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnLevel {
    /// Right and left turns resolve to opposite levels, by which side the
    /// tabs protrude toward.
    Auto,
    /// Every turn happens on this level.
    Fixed(Level),
}

impl Default for TurnLevel {
    fn default() -> Self {
        Self::Auto
    }
}

/// Configuration of one face build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceOptions {
    /// Tooth protrusion: the distance between the base and tab lines.
    pub tab_width: f64,
    /// Which side of the travel direction the tabs protrude toward.
    pub tabs_dir: Side,
    /// Level policy for turn operations.
    pub turn_level: TurnLevel,
    /// Compensate tooth overlap where faces meet at other than right angles.
    pub box_mode: bool,
    /// Closing check: maximum distance between start and end position.
    pub position_tolerance: f64,
    /// Closing check: maximum heading mismatch, degrees modulo 360.
    pub angle_tolerance_deg: f64,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            tab_width: 3.0,
            tabs_dir: Side::Left,
            turn_level: TurnLevel::Auto,
            box_mode: false,
            position_tolerance: 1e-6,
            angle_tolerance_deg: 1e-6,
        }
    }
}

type DualFn = Box<dyn Fn(Turtle, Level) -> Result<Turtle>>;
type HopFn = Box<dyn Fn(Turtle, Level, Level) -> Result<Turtle>>;

/// One accumulated builder step.
enum Step {
    /// An ordinary move, valid at either level.
    Dual { draw: DualFn },
    /// A step that bridges its neighboring gaps and may change levels.
    Hop {
        label: String,
        start: Option<LevelPref>,
        end: Option<LevelPref>,
        draw: HopFn,
    },
}

impl Step {
    fn is_hop(&self) -> bool {
        matches!(self, Step::Hop { .. })
    }
}

/// Accumulating builder for one closed face outline.
pub struct TabbedFace {
    start: Turtle,
    options: FaceOptions,
    steps: Vec<Step>,
    registry: TabRegistry,
}

impl fmt::Debug for TabbedFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabbedFace")
            .field("steps", &self.steps.len())
            .field("named_tabs", &self.registry.len())
            .field("options", &self.options)
            .finish()
    }
}

impl TabbedFace {
    /// Starts a face at the given turtle pose.
    pub fn new(start: Turtle, options: FaceOptions) -> Self {
        Self {
            start,
            options,
            steps: Vec::new(),
            registry: TabRegistry::new(),
        }
    }

    pub fn options(&self) -> &FaceOptions {
        &self.options
    }

    // --- plain moves ----------------------------------------------------

    /// A straight run along the current level's line.
    pub fn forward(mut self, distance: f64) -> Self {
        self.steps.push(Step::Dual {
            draw: Box::new(move |t, _| Ok(t.forward(distance))),
        });
        self
    }

    // --- sharp turns ----------------------------------------------------

    /// Sharp right turn at the face's turn-level policy.
    pub fn right(self, angle_deg: f64) -> Self {
        let policy = self.options.turn_level;
        self.sharp_turn(angle_deg, Side::Right, policy)
    }

    /// Sharp left turn at the face's turn-level policy.
    pub fn left(self, angle_deg: f64) -> Self {
        let policy = self.options.turn_level;
        self.sharp_turn(angle_deg, Side::Left, policy)
    }

    /// Sharp right turn at an explicit level policy.
    pub fn right_at(self, angle_deg: f64, level: TurnLevel) -> Self {
        self.sharp_turn(angle_deg, Side::Right, level)
    }

    /// Sharp left turn at an explicit level policy.
    pub fn left_at(self, angle_deg: f64, level: TurnLevel) -> Self {
        self.sharp_turn(angle_deg, Side::Left, level)
    }

    fn sharp_turn(mut self, angle_deg: f64, turn_dir: Side, policy: TurnLevel) -> Self {
        let pref = resolve_policy(policy, turn_dir, self.options.tabs_dir);
        let options = self.options.clone();
        let label = format!("{} turn", turn_dir);
        self.steps.push(Step::Hop {
            label,
            start: Some(pref),
            end: Some(pref),
            draw: Box::new(move |t, entry, exit| {
                let correction = box_correction(&options, angle_deg);
                let t = t.forward(correction);
                let t = sharp_turn_core(t, angle_deg, turn_dir, entry, &options);
                let t = t.forward(correction);
                Ok(level_shift(t, entry, exit, &options))
            }),
        });
        self
    }

    // --- arc-flavored turns ---------------------------------------------

    /// Corner arc keeping the base through-line correct: on the tab level
    /// the drawn radius grows or shrinks by the tab width.
    pub fn arc_right(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_turn(angle_deg, radius, Side::Right, true)
    }

    /// See [`TabbedFace::arc_right`].
    pub fn arc_left(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_turn(angle_deg, radius, Side::Left, true)
    }

    /// Cosmetic corner fillet: the given radius is drawn unadjusted at the
    /// resolved level.
    pub fn smooth_right(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_turn(angle_deg, radius, Side::Right, false)
    }

    /// See [`TabbedFace::smooth_right`].
    pub fn smooth_left(self, angle_deg: f64, radius: f64) -> Self {
        self.arc_turn(angle_deg, radius, Side::Left, false)
    }

    fn arc_turn(mut self, angle_deg: f64, radius: f64, turn_dir: Side, adjust: bool) -> Self {
        let pref = resolve_policy(self.options.turn_level, turn_dir, self.options.tabs_dir);
        let options = self.options.clone();
        let label = format!("{} arc turn", turn_dir);
        self.steps.push(Step::Hop {
            label,
            start: Some(pref),
            end: Some(pref),
            draw: Box::new(move |t, entry, exit| {
                let correction = box_correction(&options, angle_deg);
                let drawn_radius = if adjust && entry == Level::Tab {
                    (radius + outward_sign(turn_dir, options.tabs_dir) * options.tab_width).max(0.0)
                } else {
                    radius
                };
                let t = t.forward(correction);
                let t = match turn_dir {
                    Side::Right => t.arc_right(angle_deg, drawn_radius),
                    Side::Left => t.arc_left(angle_deg, drawn_radius),
                };
                let t = t.forward(correction);
                Ok(level_shift(t, entry, exit, &options))
            }),
        });
        self
    }

    // --- bevels ---------------------------------------------------------

    /// Chamfered corner: two half-angle turns around a flat of `width`.
    pub fn bevel_right(self, angle_deg: f64, width: f64) -> Self {
        self.bevel(angle_deg, width, Side::Right)
    }

    /// See [`TabbedFace::bevel_right`].
    pub fn bevel_left(self, angle_deg: f64, width: f64) -> Self {
        self.bevel(angle_deg, width, Side::Left)
    }

    fn bevel(mut self, angle_deg: f64, width: f64, turn_dir: Side) -> Self {
        let pref = resolve_policy(self.options.turn_level, turn_dir, self.options.tabs_dir);
        let options = self.options.clone();
        let label = format!("{} bevel", turn_dir);
        self.steps.push(Step::Hop {
            label,
            start: Some(pref),
            end: Some(pref),
            draw: Box::new(move |t, entry, exit| {
                let correction = box_correction(&options, angle_deg);
                let half = angle_deg / 2.0;
                let t = t.forward(correction);
                let t = sharp_turn_core(t, half, turn_dir, entry, &options);
                let t = t.forward(width);
                let t = sharp_turn_core(t, half, turn_dir, entry, &options);
                let t = t.forward(correction);
                Ok(level_shift(t, entry, exit, &options))
            }),
        });
        self
    }

    // --- elliptical corners ---------------------------------------------

    /// Quarter-ellipse corner; tab-level radii shift by the tab width.
    pub fn round_corner_right(self, forward: f64, side: f64) -> Self {
        self.elliptical_turn(forward, side, Side::Right, false)
    }

    /// See [`TabbedFace::round_corner_right`].
    pub fn round_corner_left(self, forward: f64, side: f64) -> Self {
        self.elliptical_turn(forward, side, Side::Left, false)
    }

    /// Half-ellipse end cap; reverses the direction of travel.
    pub fn half_ellipse_right(self, forward: f64, side: f64) -> Self {
        self.elliptical_turn(forward, side, Side::Right, true)
    }

    /// See [`TabbedFace::half_ellipse_right`].
    pub fn half_ellipse_left(self, forward: f64, side: f64) -> Self {
        self.elliptical_turn(forward, side, Side::Left, true)
    }

    fn elliptical_turn(mut self, forward: f64, side: f64, turn_dir: Side, half: bool) -> Self {
        let pref = resolve_policy(self.options.turn_level, turn_dir, self.options.tabs_dir);
        let options = self.options.clone();
        let label = if half {
            format!("{} half ellipse", turn_dir)
        } else {
            format!("{} round corner", turn_dir)
        };
        let angle = if half { 180.0 } else { 90.0 };
        self.steps.push(Step::Hop {
            label,
            start: Some(pref),
            end: Some(pref),
            draw: Box::new(move |t, entry, exit| {
                let correction = box_correction(&options, angle);
                let (fwd, lat) = if entry == Level::Tab {
                    let shift = outward_sign(turn_dir, options.tabs_dir) * options.tab_width;
                    ((forward + shift).max(0.0), (side + shift).max(0.0))
                } else {
                    (forward, side)
                };
                let t = t.forward(correction);
                let t = match (turn_dir, half) {
                    (Side::Right, false) => t.round_corner_right(fwd, lat),
                    (Side::Left, false) => t.round_corner_left(fwd, lat),
                    (Side::Right, true) => t.half_ellipse_right(fwd, lat),
                    (Side::Left, true) => t.half_ellipse_left(fwd, lat),
                };
                let t = t.forward(correction);
                Ok(level_shift(t, entry, exit, &options))
            }),
        });
        self
    }

    // --- tabbed and slotted edges ---------------------------------------

    /// A toothed edge. The edge advises starting and ending at the level of
    /// its boundary segments; it bridges to whatever the neighbors settle
    /// on by inserting boundary transitions.
    pub fn tabs(mut self, pattern: TabsPattern, options: TabsOptions) -> Self {
        let start = boundary_pref(&pattern, true);
        let end = boundary_pref(&pattern, false);
        self.steps.push(Step::Hop {
            label: "tabs edge".to_string(),
            start,
            end,
            draw: Box::new(move |t, entry, exit| {
                interlock::draw_tabs_between(t, &pattern, &options, entry, exit)
                    .map_err(Error::from)
            }),
        });
        self
    }

    /// A toothed edge registered under `name` for later faces to reference.
    pub fn tabs_def(
        mut self,
        name: impl Into<String>,
        pattern: TabsPattern,
        options: TabsOptions,
    ) -> Self {
        let name = name.into();
        self.registry
            .insert(name, TabsDef::new(pattern.clone(), options.clone()));
        self.tabs(pattern, options)
    }

    /// Draws a registered definition (typically a `fit` view from another
    /// face's registry).
    pub fn tabs_from(self, def: &TabsDef) -> Self {
        self.tabs(def.pattern.clone(), def.options.clone())
    }

    /// A slotted edge. Slots are cut on the center line, so the pen is
    /// required to travel it at base level.
    pub fn slots(mut self, pattern: SlotsPattern, options: SlotsOptions) -> Self {
        self.steps.push(Step::Hop {
            label: "slots edge".to_string(),
            start: Some(LevelPref::Required(Level::Base)),
            end: Some(LevelPref::Required(Level::Base)),
            draw: Box::new(move |t, _, _| Ok(interlock::draw_slots(t, &pattern, &options))),
        });
        self
    }

    // --- named-tab views ------------------------------------------------

    /// The raw definition registered under `name`.
    pub fn tab(&self, name: &str) -> Option<&TabsDef> {
        self.registry.def(name)
    }

    /// The reversed + inverted definition for an adjoining face.
    pub fn fit(&self, name: &str) -> Option<&TabsDef> {
        self.registry.fit(name)
    }

    /// Just the pattern registered under `name`.
    pub fn pattern(&self, name: &str) -> Option<&TabsPattern> {
        self.registry.pattern(name)
    }

    // --- closing --------------------------------------------------------

    /// Resolves every gap level, replays the accumulated steps, and checks
    /// that the outline returns to its start pose.
    ///
    /// The level at the shared start/end point is inferred from the last
    /// and first hops with the same two-sided rule used everywhere else; a
    /// synthetic zero-length hop pins that level at both ends, so the face
    /// begins and must finish on it.
    pub fn close_face(self) -> Result<ClosedFace> {
        let hops: Vec<usize> = self
            .steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| step.is_hop().then_some(i))
            .collect();

        // Gap g sits after hop g; the last gap wraps across the start point.
        let mut gap_levels = Vec::with_capacity(hops.len());
        for (g, &left_index) in hops.iter().enumerate() {
            let right_index = hops[(g + 1) % hops.len()];
            gap_levels.push(infer_gap_level(
                &self.steps[left_index],
                &self.steps[right_index],
            )?);
        }
        let seam_level = gap_levels.last().copied().unwrap_or(Level::Base);
        debug!(
            hops = hops.len(),
            seam = %seam_level,
            "resolved face levels"
        );

        let start_position = self.start.position();
        let start_heading = self.start.heading_deg();

        let mut turtle = self.start;
        let mut current_level = seam_level;
        let mut hop_ordinal = 0usize;
        for step in &self.steps {
            match step {
                Step::Dual { draw } => {
                    turtle = draw(turtle, current_level)?;
                }
                Step::Hop { draw, .. } => {
                    let exit = gap_levels[hop_ordinal];
                    turtle = draw(turtle, current_level, exit)?;
                    current_level = exit;
                    hop_ordinal += 1;
                }
            }
        }

        let end_position = turtle.position();
        let end_heading = turtle.heading_deg();
        let position_error = end_position.distance_to(&start_position);
        let heading_error = heading_difference_deg(end_heading, start_heading);
        debug!(position_error, heading_error, "face closing check");

        if position_error > self.options.position_tolerance
            || heading_error > self.options.angle_tolerance_deg
        {
            return Err(FaceError::NotClosed {
                expected_x: start_position.x,
                expected_y: start_position.y,
                expected_heading: start_heading,
                observed_x: end_position.x,
                observed_y: end_position.y,
                observed_heading: end_heading,
            }
            .into());
        }

        Ok(ClosedFace {
            outline: turtle.into_path(),
            tabs: self.registry,
        })
    }
}

/// A finished face: the outline path plus the retained named-tab registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedFace {
    outline: Path,
    tabs: TabRegistry,
}

impl ClosedFace {
    /// The finished outline.
    pub fn outline(&self) -> &Path {
        &self.outline
    }

    pub fn into_outline(self) -> Path {
        self.outline
    }

    /// The raw definition registered under `name`.
    pub fn tab(&self, name: &str) -> Option<&TabsDef> {
        self.tabs.def(name)
    }

    /// The reversed + inverted definition for an adjoining face.
    pub fn fit(&self, name: &str) -> Option<&TabsDef> {
        self.tabs.fit(name)
    }

    /// Just the pattern registered under `name`.
    pub fn pattern(&self, name: &str) -> Option<&TabsPattern> {
        self.tabs.pattern(name)
    }

    /// Registered names in sorted order.
    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.names()
    }
}

// --- level machinery ----------------------------------------------------

fn resolve_policy(policy: TurnLevel, turn_dir: Side, tabs_dir: Side) -> LevelPref {
    match policy {
        TurnLevel::Fixed(level) => LevelPref::Required(level),
        TurnLevel::Auto => {
            // Turning away from the tab side keeps the tab line outside the
            // corner; toward it, the base line is the one that stays put.
            let level = if turn_dir == tabs_dir {
                Level::Base
            } else {
                Level::Tab
            };
            LevelPref::Advisory(level)
        }
    }
}

fn boundary_pref(pattern: &TabsPattern, first: bool) -> Option<LevelPref> {
    let segments = pattern.segments();
    let segment = if first {
        segments.first()
    } else {
        segments.last()
    }?;
    let level = if segment.active {
        Level::Tab
    } else {
        Level::Base
    };
    Some(LevelPref::Advisory(level))
}

fn infer_gap_level(left: &Step, right: &Step) -> Result<Level> {
    let (left_label, left_pref) = match left {
        Step::Hop { label, end, .. } => (label.as_str(), *end),
        Step::Dual { .. } => ("move", None),
    };
    let (right_label, right_pref) = match right {
        Step::Hop { label, start, .. } => (label.as_str(), *start),
        Step::Dual { .. } => ("move", None),
    };

    match (left_pref, right_pref) {
        (Some(LevelPref::Required(a)), Some(LevelPref::Required(b))) if a != b => {
            Err(FaceError::LevelConflict {
                earlier: left_label.to_string(),
                earlier_level: a.to_string(),
                later: right_label.to_string(),
                later_level: b.to_string(),
            }
            .into())
        }
        (Some(LevelPref::Required(a)), _) => Ok(a),
        (_, Some(LevelPref::Required(b))) => Ok(b),
        // Conflicting advice falls back to the default level.
        (Some(LevelPref::Advisory(a)), Some(LevelPref::Advisory(b))) if a != b => Ok(Level::Base),
        (Some(LevelPref::Advisory(a)), _) => Ok(a),
        (_, Some(LevelPref::Advisory(b))) => Ok(b),
        (None, None) => Ok(Level::Base),
    }
}

fn outward_sign(turn_dir: Side, tabs_dir: Side) -> f64 {
    if turn_dir == tabs_dir {
        -1.0
    } else {
        1.0
    }
}

fn strafe(turtle: Turtle, side: Side, distance: f64) -> Turtle {
    match side {
        Side::Left => turtle.strafe_left(distance),
        Side::Right => turtle.strafe_right(distance),
    }
}

/// Perpendicular hop between the two lines at a boundary.
fn level_shift(turtle: Turtle, from: Level, to: Level, options: &FaceOptions) -> Turtle {
    if from == to {
        return turtle;
    }
    match to {
        Level::Tab => strafe(turtle, options.tabs_dir, options.tab_width),
        Level::Base => strafe(turtle, options.tabs_dir.opposite(), options.tab_width),
    }
}

fn sharp_turn_core(
    turtle: Turtle,
    angle_deg: f64,
    turn_dir: Side,
    level: Level,
    options: &FaceOptions,
) -> Turtle {
    let rotate = |t: Turtle| match turn_dir {
        Side::Right => t.right(angle_deg),
        Side::Left => t.left(angle_deg),
    };
    match level {
        Level::Base => rotate(turtle),
        Level::Tab => {
            let multiplier = (angle_deg.to_radians() / 2.0).tan();
            if !multiplier.is_finite() || multiplier.abs() > MAX_TURN_OFFSET_RATIO {
                // Near-reversal turns: the tangent offset blows up, so drop
                // to the base line, turn there, and climb back out.
                let t = strafe(turtle, options.tabs_dir.opposite(), options.tab_width);
                let t = rotate(t);
                strafe(t, options.tabs_dir, options.tab_width)
            } else {
                let offset =
                    options.tab_width * multiplier * outward_sign(turn_dir, options.tabs_dir);
                rotate(turtle.forward(offset)).forward(offset)
            }
        }
    }
}

fn box_correction(options: &FaceOptions, angle_deg: f64) -> f64 {
    if !options.box_mode {
        return 0.0;
    }
    let cosine = angle_deg.to_radians().cos().max(0.0);
    options.tab_width * cosine / (1.0 + cosine)
}
