//! Measurement helpers for joint geometry
//!
//! All lengths are plain drawing units (typically millimeters). The kerf is
//! carried as a one-side correction: half of the material removed by the
//! cutting beam, applied independently to each of two mating edges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One-side kerf correction, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Kerf {
    one_side: f64,
}

impl Kerf {
    /// The identity correction: no kerf compensation at all.
    pub const ZERO: Kerf = Kerf { one_side: 0.0 };

    /// Creates a kerf from the correction applied to a single side of a cut.
    pub fn from_one_side(one_side: f64) -> Self {
        Self { one_side }
    }

    /// Creates a kerf from the full beam width (half per side).
    pub fn from_beam_width(beam_width: f64) -> Self {
        Self {
            one_side: beam_width / 2.0,
        }
    }

    /// The correction applied to each side of a cut.
    pub fn one_side(&self) -> f64 {
        self.one_side
    }

    /// The full beam width this correction corresponds to.
    pub fn beam_width(&self) -> f64 {
        self.one_side * 2.0
    }
}

impl fmt::Display for Kerf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}/side", self.one_side)
    }
}

impl FromStr for Kerf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches("/side").trim();
        trimmed
            .parse::<f64>()
            .map(Kerf::from_one_side)
            .map_err(|_| format!("Invalid kerf value: {}", s))
    }
}

/// A side relative to the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// To the left of the heading.
    Left,
    /// To the right of the heading.
    Right,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl Default for Side {
    fn default() -> Self {
        Self::Left
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(format!("Unknown side: {}", s)),
        }
    }
}
