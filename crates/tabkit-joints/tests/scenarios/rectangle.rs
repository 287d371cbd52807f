//! A rectangular panel with fit-matched tab pairs on opposite edges.

use tabkit_core::pattern::{DistributedSpec, TabsPattern};
use tabkit_core::units::Side;
use tabkit_joints::{FaceOptions, TabbedFace, TabsOptions};
use tabkit_turtle::Turtle;

const WIDTH: f64 = 60.0;
const HEIGHT: f64 = 40.0;

fn horizontal_tabs(length: f64) -> TabsPattern {
    TabsPattern::distributed(&DistributedSpec {
        length,
        tab_every_len: Some(15.0),
        ..DistributedSpec::default()
    })
    .unwrap()
}

fn vertical_tabs() -> TabsPattern {
    TabsPattern::distributed(&DistributedSpec {
        length: HEIGHT,
        tab_every_len: Some(10.0),
        ..DistributedSpec::default()
    })
    .unwrap()
}

fn edge_options() -> TabsOptions {
    TabsOptions {
        tab_width: 3.0,
        tabs_dir: Side::Right,
        ..TabsOptions::default()
    }
}

fn face_options() -> FaceOptions {
    FaceOptions {
        tab_width: 3.0,
        tabs_dir: Side::Right,
        ..FaceOptions::default()
    }
}

#[test]
fn rectangle_with_fit_matched_edges_closes() {
    let face = TabbedFace::new(Turtle::new(), face_options())
        .tabs_def("south", horizontal_tabs(WIDTH), edge_options())
        .left(90.0)
        .tabs_def("east", vertical_tabs(), edge_options())
        .left(90.0);

    // Opposite edges mate with the named ones, so they draw the fit views.
    let north = face.fit("south").unwrap().clone();
    let west = face.fit("east").unwrap().clone();
    let face = face
        .tabs_from(&north)
        .left(90.0)
        .tabs_from(&west)
        .left(90.0);

    let closed = face.close_face().unwrap();

    // Teeth protrude one tab width outward on every side.
    let (min_x, min_y, max_x, max_y) = closed.outline().bounding_box().unwrap();
    assert!((min_x + 3.0).abs() < 1e-6);
    assert!((min_y + 3.0).abs() < 1e-6);
    assert!((max_x - (WIDTH + 3.0)).abs() < 1e-6);
    assert!((max_y - (HEIGHT + 3.0)).abs() < 1e-6);

    // The registry survives closing.
    assert_eq!(closed.tab_names().collect::<Vec<_>>(), vec!["east", "south"]);
    assert!(closed.tab("south").is_some());
    assert!(closed.fit("east").is_some());
    assert!((closed.pattern("south").unwrap().total_length() - WIDTH).abs() < 1e-9);
}

#[test]
fn shrunk_edge_fails_the_closing_check() {
    let face = TabbedFace::new(Turtle::new(), face_options())
        .tabs_def("south", horizontal_tabs(WIDTH), edge_options())
        .left(90.0)
        .tabs_def("east", vertical_tabs(), edge_options())
        .left(90.0)
        // Half a unit short: the outline cannot come back home.
        .tabs(
            horizontal_tabs(WIDTH - 0.5).matching_tabs(),
            edge_options(),
        )
        .left(90.0)
        .tabs(vertical_tabs().matching_tabs(), edge_options())
        .left(90.0);

    let err = face.close_face().unwrap_err();
    assert!(err.is_not_closed());
    let message = err.to_string();
    assert!(message.contains("not closed"));
}

#[test]
fn tooth_ended_edges_lift_the_corners() {
    // Patterns that begin and end with a tooth pull every corner up to the
    // tab line; the corner offsets route the outline around it and the face
    // still closes.
    let toothy = |length: f64, every: f64| {
        TabsPattern::distributed(&DistributedSpec {
            length,
            tab_every_len: Some(every),
            start_with_tab: true,
            end_with_tab: true,
            ..DistributedSpec::default()
        })
        .unwrap()
    };

    let face = TabbedFace::new(Turtle::new(), face_options())
        .tabs(toothy(WIDTH, 15.0), edge_options())
        .left(90.0)
        .tabs(toothy(HEIGHT, 10.0), edge_options())
        .left(90.0)
        .tabs(toothy(WIDTH, 15.0), edge_options())
        .left(90.0)
        .tabs(toothy(HEIGHT, 10.0), edge_options())
        .left(90.0);

    let closed = face.close_face().unwrap();
    assert!(!closed.outline().is_empty());
}

#[test]
fn closed_faces_serialize_with_their_registry() {
    let face = TabbedFace::new(Turtle::new(), face_options())
        .tabs_def("south", horizontal_tabs(WIDTH), edge_options())
        .left(90.0)
        .tabs_def("east", vertical_tabs(), edge_options())
        .left(90.0);
    let north = face.fit("south").unwrap().clone();
    let west = face.fit("east").unwrap().clone();
    let closed = face
        .tabs_from(&north)
        .left(90.0)
        .tabs_from(&west)
        .left(90.0)
        .close_face()
        .unwrap();

    let json = serde_json::to_string(&closed).unwrap();
    let back: tabkit_joints::ClosedFace = serde_json::from_str(&json).unwrap();
    assert_eq!(back.outline(), closed.outline());
    assert_eq!(
        back.tab_names().collect::<Vec<_>>(),
        closed.tab_names().collect::<Vec<_>>()
    );
}
