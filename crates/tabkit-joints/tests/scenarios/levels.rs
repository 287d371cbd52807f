//! Level inference, conflicts, slotted edges, and box-mode corrections.

use tabkit_core::pattern::{SlotsPattern, TabsPattern};
use tabkit_core::units::{Kerf, Side};
use tabkit_joints::{
    FaceOptions, Level, SlotsOptions, TabbedFace, TabsOptions, TurnLevel,
};
use tabkit_turtle::Turtle;

fn face_options() -> FaceOptions {
    FaceOptions {
        tab_width: 3.0,
        tabs_dir: Side::Right,
        ..FaceOptions::default()
    }
}

#[test]
fn conflicting_required_levels_fail() {
    let slots = SlotsPattern::new()
        .closed(5.0)
        .unwrap()
        .open(10.0)
        .unwrap()
        .closed(5.0)
        .unwrap();

    let face = TabbedFace::new(Turtle::new(), face_options())
        .slots(slots, SlotsOptions::default())
        // A turn forced onto the tab line right after an edge that must end
        // on the base line.
        .right_at(90.0, TurnLevel::Fixed(Level::Tab));

    let err = face.close_face().unwrap_err();
    assert!(err.is_face_error());
    assert!(err.to_string().contains("Conflicting required levels"));
}

#[test]
fn slotted_panel_closes_with_plain_corners() {
    let slots = SlotsPattern::new()
        .closed(6.0)
        .unwrap()
        .open(8.0)
        .unwrap()
        .closed(6.0)
        .unwrap();
    let slot_options = SlotsOptions {
        slot_width: 3.0,
        kerf: Kerf::from_one_side(0.1),
        slot_width_kerf: Kerf::from_one_side(0.1),
    };

    let face = TabbedFace::new(Turtle::new(), face_options())
        .slots(slots, slot_options)
        .left_at(90.0, TurnLevel::Fixed(Level::Base))
        .forward(15.0)
        .left_at(90.0, TurnLevel::Fixed(Level::Base))
        .forward(20.0)
        .left_at(90.0, TurnLevel::Fixed(Level::Base))
        .forward(15.0)
        .left_at(90.0, TurnLevel::Fixed(Level::Base));

    let closed = face.close_face().unwrap();

    // One rectangular opening: four drawn sides, plus the four panel edges
    // minus the slotted edge's center line, which is pen-up travel.
    let drawing = closed
        .outline()
        .commands()
        .iter()
        .filter(|c| c.is_drawing())
        .count();
    assert_eq!(drawing, 7);
}

#[test]
fn mixed_tab_and_plain_edges_close() {
    let tabs = TabsPattern::new()
        .skip(5.0)
        .unwrap()
        .tab(10.0)
        .unwrap()
        .skip(5.0)
        .unwrap();
    let tab_options = TabsOptions {
        tab_width: 3.0,
        tabs_dir: Side::Right,
        kerf: Kerf::from_one_side(0.15),
        ..TabsOptions::default()
    };

    let face = TabbedFace::new(Turtle::new(), face_options())
        .tabs(tabs.clone(), tab_options.clone())
        .left(90.0)
        .forward(12.0)
        .left(90.0)
        .tabs(tabs.matching_tabs().reverse(), tab_options)
        .left(90.0)
        .forward(12.0)
        .left(90.0);

    let closed = face.close_face().unwrap();
    assert!(!closed.outline().is_empty());
}

#[test]
fn box_mode_grows_the_outline_at_acute_corners() {
    let hexagon = |box_mode: bool| {
        let options = FaceOptions {
            box_mode,
            turn_level: TurnLevel::Fixed(Level::Base),
            ..face_options()
        };
        let mut face = TabbedFace::new(Turtle::new(), options);
        for _ in 0..6 {
            face = face.forward(20.0).left(60.0);
        }
        face.close_face().unwrap()
    };

    let plain = hexagon(false);
    let corrected = hexagon(true);

    let (_, _, plain_max_x, _) = plain.outline().bounding_box().unwrap();
    let (_, _, corrected_max_x, _) = corrected.outline().bounding_box().unwrap();

    // Every corner gains tab_width * cos(60) / (1 + cos(60)) = 1.0 of
    // forward travel on each side, so the hexagon grows but still closes.
    assert!(corrected_max_x > plain_max_x + 1.0);
}
