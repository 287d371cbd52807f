//! Tab and slot edge geometry.
//!
//! Turns an interlock pattern plus kerf correction into concrete turtle
//! movements along one edge: a toothed profile weaving between the base
//! line and the parallel tab line, or the closed rectangular openings of a
//! slotted edge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabkit_core::error::{JointError, JointResult};
use tabkit_core::pattern::{PatternSegment, SlotsPattern, TabsPattern};
use tabkit_core::units::{Kerf, Side};
use tabkit_turtle::{Point, Turtle, GEOM_EPSILON};

use crate::face::Level;

/// Parameters for drawing one toothed edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabsOptions {
    /// One-side cut correction applied at tooth transitions.
    pub kerf: Kerf,
    /// Tooth protrusion: the distance between the base and tab lines.
    pub tab_width: f64,
    /// Which side of the travel direction the teeth protrude toward.
    pub tabs_dir: Side,
    /// Fillet radius on the tooth-side (convex) corners.
    pub outer_corners_radius: f64,
    /// Fillet radius on the base-side (concave) corners.
    pub inner_corners_radius: f64,
}

impl Default for TabsOptions {
    fn default() -> Self {
        Self {
            kerf: Kerf::ZERO,
            tab_width: 3.0,
            tabs_dir: Side::Left,
            outer_corners_radius: 0.0,
            inner_corners_radius: 0.0,
        }
    }
}

/// Parameters for drawing one slotted edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsOptions {
    /// One-side correction applied to the opening ends along the edge.
    pub kerf: Kerf,
    /// Slot width across the edge, typically the mating material thickness.
    pub slot_width: f64,
    /// One-side correction applied across the slot width.
    pub slot_width_kerf: Kerf,
}

impl Default for SlotsOptions {
    fn default() -> Self {
        Self {
            kerf: Kerf::ZERO,
            slot_width: 3.0,
            slot_width_kerf: Kerf::ZERO,
        }
    }
}

/// The slot width actually drawn, after kerf reduction.
pub fn slot_cut_width(options: &SlotsOptions) -> f64 {
    (options.slot_width - 2.0 * options.slot_width_kerf.one_side()).max(0.0)
}

/// One level change along a toothed edge.
#[derive(Debug, Clone, Copy)]
struct Transition {
    /// Nominal position along the edge, before kerf shifting.
    position: f64,
    /// Whether the edge rises onto a tooth here (or falls off one).
    rising: bool,
    /// A transition at the true start boundary has no preceding edge to
    /// react against and is left uncorrected.
    kerf_eligible: bool,
}

fn segment_level(segment: &PatternSegment) -> Level {
    if segment.active {
        Level::Tab
    } else {
        Level::Base
    }
}

/// Expands a pattern into its ordered transition list for the given entry
/// and exit levels.
fn expand_transitions(segments: &[PatternSegment], entry: Level, exit: Level) -> Vec<Transition> {
    let mut transitions = Vec::new();

    let Some(first) = segments.first() else {
        if entry != exit {
            transitions.push(Transition {
                position: 0.0,
                rising: exit == Level::Tab,
                kerf_eligible: false,
            });
        }
        return transitions;
    };

    if segment_level(first) != entry {
        transitions.push(Transition {
            position: 0.0,
            rising: segment_level(first) == Level::Tab,
            kerf_eligible: false,
        });
    }

    let mut position = 0.0;
    for pair in segments.windows(2) {
        position += pair[0].length;
        transitions.push(Transition {
            position,
            rising: pair[1].active,
            kerf_eligible: true,
        });
    }

    let last = segments.last().unwrap_or(first);
    position += last.length;
    if segment_level(last) != exit {
        transitions.push(Transition {
            position,
            rising: exit == Level::Tab,
            kerf_eligible: true,
        });
    }

    transitions
}

/// Draws a toothed edge, entering and leaving on the base line.
pub fn draw_tabs(turtle: Turtle, tabs: &TabsPattern, options: &TabsOptions) -> JointResult<Turtle> {
    draw_tabs_between(turtle, tabs, options, Level::Base, Level::Base)
}

/// Draws a toothed edge between explicit entry and exit levels.
///
/// Kerf-eligible transitions shift by the one-side kerf: later when rising
/// into a tooth, earlier when falling out of one, so drawn teeth shrink and
/// drawn gaps grow as the kerf grows. Each transition is drawn by a
/// direction-aware corner routine: zero radii produce a plain pair of
/// 90-degree turns, non-zero radii an S-shaped pair of opposite fillet
/// arcs. Fails with [`JointError::NegativeEdge`] when kerf and radii eat a
/// straight run below zero.
pub fn draw_tabs_between(
    turtle: Turtle,
    tabs: &TabsPattern,
    options: &TabsOptions,
    entry: Level,
    exit: Level,
) -> JointResult<Turtle> {
    let segments = tabs.segments();
    let total = tabs.total_length();
    let transitions = expand_transitions(segments, entry, exit);
    debug!(
        transitions = transitions.len(),
        total, "drawing toothed edge"
    );

    let kerf = options.kerf.one_side();
    let inner = options.inner_corners_radius;
    let outer = options.outer_corners_radius;

    let mut t = turtle;
    let mut cursor = 0.0;
    let mut trailing_radius = 0.0;

    for transition in &transitions {
        let shifted = if transition.kerf_eligible {
            if transition.rising {
                transition.position + kerf
            } else {
                transition.position - kerf
            }
        } else {
            transition.position
        };

        // The corner on the approach side eats into the straight run.
        let leading_radius = if transition.rising { inner } else { outer };
        let run = shifted - cursor - trailing_radius - leading_radius;
        if run < -GEOM_EPSILON {
            return Err(JointError::NegativeEdge {
                position: transition.position,
                deficit: -run,
            });
        }

        t = t.forward(run.max(0.0));
        t = draw_transition(t, transition.rising, options)?;

        cursor = shifted;
        trailing_radius = if transition.rising { outer } else { inner };
    }

    let closing_run = total - cursor - trailing_radius;
    if closing_run < -GEOM_EPSILON {
        return Err(JointError::NegativeEdge {
            position: total,
            deficit: -closing_run,
        });
    }
    Ok(t.forward(closing_run.max(0.0)))
}

/// Draws one transition between the base and tab lines.
///
/// Rising transitions turn toward the tab side first (inner fillet at the
/// base), then back (outer fillet at the tooth top); falling transitions
/// mirror that. With both radii set the result is an S-shaped pair of
/// opposite arcs.
fn draw_transition(turtle: Turtle, rising: bool, options: &TabsOptions) -> JointResult<Turtle> {
    let inner = options.inner_corners_radius;
    let outer = options.outer_corners_radius;
    let wall = options.tab_width - inner - outer;
    if wall < -GEOM_EPSILON {
        return Err(JointError::NegativeEdge {
            position: 0.0,
            deficit: -wall,
        });
    }

    let toward = options.tabs_dir;
    let away = toward.opposite();

    let t = if rising {
        let t = corner(turtle, toward, inner);
        let t = t.forward(wall.max(0.0));
        corner(t, away, outer)
    } else {
        let t = corner(turtle, away, outer);
        let t = t.forward(wall.max(0.0));
        corner(t, toward, inner)
    };
    Ok(t)
}

fn corner(turtle: Turtle, direction: Side, radius: f64) -> Turtle {
    match (direction, radius.abs() < GEOM_EPSILON) {
        (Side::Left, true) => turtle.left(90.0),
        (Side::Right, true) => turtle.right(90.0),
        (Side::Left, false) => turtle.arc_left(90.0, radius),
        (Side::Right, false) => turtle.arc_right(90.0, radius),
    }
}

/// Draws a slotted edge: one closed rectangular opening per active segment.
///
/// The openings are traced in two mirrored passes offset by half the
/// kerf-reduced slot width from the center line, connected through pen-up
/// travel. Afterwards the turtle stands at the edge's end point on the
/// center line with its heading and pen state unchanged.
pub fn draw_slots(turtle: Turtle, slots: &SlotsPattern, options: &SlotsOptions) -> Turtle {
    let origin = turtle.position();
    let heading = turtle.heading_deg();
    let pen_was_down = turtle.is_pen_down();
    let total = slots.total_length();

    let half_width = slot_cut_width(options) / 2.0;
    let kerf = options.kerf.one_side();

    // Openings grow by the kerf at both ends, clamped to the edge.
    let mut openings: Vec<(f64, f64)> = Vec::new();
    let mut position = 0.0;
    for segment in slots.segments() {
        if segment.active {
            let start = (position - kerf).max(0.0);
            let end = (position + segment.length + kerf).min(total);
            if end - start > GEOM_EPSILON {
                openings.push((start, end));
            }
        }
        position += segment.length;
    }
    debug!(openings = openings.len(), total, "drawing slotted edge");

    let at = |along: f64, offset: f64| -> Point {
        origin
            .advanced(heading, along)
            .advanced(heading + 90.0, offset)
    };

    let mut t = turtle.pen_up();

    // First pass: near long side plus the far cap of each opening.
    for &(start, end) in &openings {
        t = t
            .jump_to(at(start, half_width))
            .pen_down()
            .go_to(at(end, half_width))
            .go_to(at(end, -half_width))
            .pen_up();
    }

    // Mirrored return pass: far long side plus the near cap.
    for &(start, end) in openings.iter().rev() {
        t = t
            .jump_to(at(end, -half_width))
            .pen_down()
            .go_to(at(start, -half_width))
            .go_to(at(start, half_width))
            .pen_up();
    }

    t = t.jump_to(at(total, 0.0));
    if pen_was_down {
        t = t.pen_down();
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabkit_core::pattern::InterlockPattern;
    use tabkit_turtle::PathCommand;

    fn tooth_pattern() -> TabsPattern {
        TabsPattern::new()
            .skip(4.0)
            .unwrap()
            .tab(6.0)
            .unwrap()
            .skip(4.0)
            .unwrap()
    }

    /// Extracts the drawn length of each straight run parallel to +X.
    fn run_lengths(turtle: &Turtle) -> Vec<f64> {
        let mut lengths = Vec::new();
        let mut cursor = Point::new(0.0, 0.0);
        for command in turtle.commands() {
            if let PathCommand::LineTo { to } = command {
                if (to.y - cursor.y).abs() < 1e-9 && (to.x - cursor.x).abs() > 1e-9 {
                    lengths.push(to.x - cursor.x);
                }
            }
            cursor = command.end_point();
        }
        lengths
    }

    #[test]
    fn test_tabs_edge_ends_on_base_line() {
        let options = TabsOptions::default();
        let t = draw_tabs(Turtle::new(), &tooth_pattern(), &options).unwrap();
        assert!(t.position().approx_eq(&Point::new(14.0, 0.0), 1e-9));
        assert!((t.heading_deg()).abs() < 1e-9);
    }

    #[test]
    fn test_kerf_shrinks_tooth_and_grows_gaps() {
        let options = TabsOptions {
            kerf: Kerf::from_one_side(0.2),
            ..TabsOptions::default()
        };
        let t = draw_tabs(Turtle::new(), &tooth_pattern(), &options).unwrap();
        let runs = run_lengths(&t);
        // Base run, tooth-top run, base run.
        assert_eq!(runs.len(), 3);
        assert!((runs[0] - 4.2).abs() < 1e-9);
        assert!((runs[1] - 5.6).abs() < 1e-9);
        assert!((runs[2] - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_kerf_monotonic_tightening() {
        let mut previous_tooth = f64::INFINITY;
        let mut previous_gap = 0.0;
        for &kerf in &[0.0, 0.1, 0.2, 0.4] {
            let options = TabsOptions {
                kerf: Kerf::from_one_side(kerf),
                ..TabsOptions::default()
            };
            let drawn = draw_tabs(Turtle::new(), &tooth_pattern(), &options).unwrap();
            let runs = run_lengths(&drawn);
            let tooth = runs[1];
            let gap = runs[0];

            assert!(tooth < previous_tooth);
            assert!(gap > previous_gap);
            previous_tooth = tooth;
            previous_gap = gap;

            // The mating edge gets the complementary change: its gap over
            // this tooth's span grows by the same amount the tooth shrank.
            let mating = tooth_pattern().matching_tabs();
            let mating_drawn = draw_tabs(Turtle::new(), &mating, &options).unwrap();
            let mating_runs = run_lengths(&mating_drawn);
            let receiving_gap = mating_runs[1];
            assert!((receiving_gap - (6.0 + 2.0 * kerf)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_first_boundary_transition_is_uncorrected() {
        // A pattern that starts with a tooth forces a transition at the
        // start boundary; that one must sit exactly at zero.
        let pattern = TabsPattern::new().tab(5.0).unwrap().skip(5.0).unwrap();
        let options = TabsOptions {
            kerf: Kerf::from_one_side(0.3),
            ..TabsOptions::default()
        };
        let t = draw_tabs(Turtle::new(), &pattern, &options).unwrap();

        // The first drawn command is the transition wall going up from the
        // base line at x = 0, not a shifted forward run.
        match t.commands()[0] {
            PathCommand::LineTo { to } => {
                assert!((to.x).abs() < 1e-9);
                assert!((to.y - options.tab_width).abs() < 1e-9);
            }
            ref other => panic!("expected wall line, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_edge_detected() {
        // Teeth of 1.0 with a kerf shift of 0.6 per side leaves the
        // tooth-top run 1.0 - 1.2 < 0.
        let pattern = TabsPattern::from_pattern(
            InterlockPattern::from_segments([(false, 3.0), (true, 1.0), (false, 3.0)]).unwrap(),
        );
        let options = TabsOptions {
            kerf: Kerf::from_one_side(0.6),
            ..TabsOptions::default()
        };
        let err = draw_tabs(Turtle::new(), &pattern, &options).unwrap_err();
        assert!(matches!(err, JointError::NegativeEdge { .. }));
    }

    #[test]
    fn test_radii_draw_s_shaped_transitions() {
        let options = TabsOptions {
            outer_corners_radius: 0.5,
            inner_corners_radius: 0.5,
            ..TabsOptions::default()
        };
        let t = draw_tabs(Turtle::new(), &tooth_pattern(), &options).unwrap();
        let arcs: Vec<bool> = t
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::Arc { sweep, .. } => Some(*sweep),
                _ => None,
            })
            .collect();
        // Two transitions, two opposite fillets each.
        assert_eq!(arcs.len(), 4);
        assert_ne!(arcs[0], arcs[1]);
        assert_ne!(arcs[2], arcs[3]);
        assert!(t.position().approx_eq(&Point::new(14.0, 0.0), 1e-9));
    }

    #[test]
    fn test_radii_bigger_than_spans_fail() {
        let options = TabsOptions {
            inner_corners_radius: 5.0,
            ..TabsOptions::default()
        };
        let err = draw_tabs(Turtle::new(), &tooth_pattern(), &options).unwrap_err();
        assert!(matches!(err, JointError::NegativeEdge { .. }));
    }

    #[test]
    fn test_entry_exit_levels_add_boundary_transitions() {
        let pattern = tooth_pattern();
        let options = TabsOptions::default();
        let t = draw_tabs_between(Turtle::new(), &pattern, &options, Level::Tab, Level::Base)
            .unwrap();
        // Entering on the tab line over a gap segment: an uncorrected
        // falling transition right at the start.
        match t.commands()[0] {
            PathCommand::LineTo { to } => {
                assert!((to.x).abs() < 1e-9);
                assert!((to.y + options.tab_width).abs() < 1e-9);
            }
            ref other => panic!("expected falling wall, got {:?}", other),
        }
        // Entering on the tab line puts the base line at -tab_width.
        assert!(t.position().approx_eq(&Point::new(14.0, -3.0), 1e-9));
    }

    #[test]
    fn test_slot_cut_width_clamps_at_zero() {
        let options = SlotsOptions {
            slot_width: 3.0,
            slot_width_kerf: Kerf::from_one_side(0.25),
            ..SlotsOptions::default()
        };
        assert!((slot_cut_width(&options) - 2.5).abs() < 1e-12);

        let crushed = SlotsOptions {
            slot_width: 0.2,
            slot_width_kerf: Kerf::from_one_side(0.5),
            ..SlotsOptions::default()
        };
        assert_eq!(slot_cut_width(&crushed), 0.0);
    }

    #[test]
    fn test_slots_restore_pose_and_close_rectangles() {
        let slots = SlotsPattern::new()
            .closed(3.0)
            .unwrap()
            .open(4.0)
            .unwrap()
            .closed(3.0)
            .unwrap();
        let options = SlotsOptions {
            slot_width: 2.0,
            ..SlotsOptions::default()
        };
        let start = Turtle::at(Point::new(1.0, 1.0), 90.0);
        let t = draw_slots(start, &slots, &options);

        assert!(t.position().approx_eq(&Point::new(1.0, 11.0), 1e-9));
        assert!((t.heading_deg() - 90.0).abs() < 1e-9);
        assert!(t.is_pen_down());

        // Four drawn sides for the one opening.
        let drawn = t.commands().iter().filter(|c| c.is_drawing()).count();
        assert_eq!(drawn, 4);
    }

    #[test]
    fn test_slots_kerf_grows_openings() {
        let slots = SlotsPattern::new()
            .closed(3.0)
            .unwrap()
            .open(4.0)
            .unwrap()
            .closed(3.0)
            .unwrap();
        let options = SlotsOptions {
            slot_width: 2.0,
            kerf: Kerf::from_one_side(0.25),
            ..SlotsOptions::default()
        };
        let t = draw_slots(Turtle::new(), &slots, &options);

        // The long sides of the opening run from 2.75 to 7.25.
        let xs: Vec<f64> = t
            .commands()
            .iter()
            .filter(|c| c.is_drawing())
            .map(|c| c.end_point().x)
            .collect();
        assert!(xs.iter().any(|&x| (x - 7.25).abs() < 1e-9));
        assert!(xs.iter().any(|&x| (x - 2.75).abs() < 1e-9));
    }
}
