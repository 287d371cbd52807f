//! # TabKit Joints
//!
//! Edge geometry and face building for finger-jointed parts:
//!
//! - **Interlock**: pure functions turning a tab/slot pattern plus kerf
//!   correction into concrete turtle movements along one edge
//! - **TabbedFace**: the dual-level builder sequencing edges and turns into
//!   one closed, validated outline
//! - **Registry**: face-local named tab definitions with eagerly derived
//!   fit views for adjoining faces

pub mod face;
pub mod interlock;
pub mod registry;

pub use face::{ClosedFace, FaceOptions, Level, LevelPref, TabbedFace, TurnLevel};
pub use interlock::{
    draw_slots, draw_tabs, draw_tabs_between, slot_cut_width, SlotsOptions, TabsOptions,
};
pub use registry::{TabRegistry, TabsDef};
