//! Domain-typed pattern wrappers
//!
//! The same alternating-segment pattern reads two ways: on a toothed edge
//! the active segments are teeth, on a slotted edge they are openings. The
//! wrappers keep the two interpretations apart and carry the conversions
//! between the edges of mating pieces.

use serde::{Deserialize, Serialize};

use super::{InterlockPattern, PatternSegment};
use crate::error::{PatternError, PatternResult};

/// A pattern whose active segments are protruding teeth.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabsPattern {
    pattern: InterlockPattern,
}

impl TabsPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pattern(pattern: InterlockPattern) -> Self {
        Self { pattern }
    }

    /// Appends a tooth.
    pub fn tab(&self, length: f64) -> PatternResult<Self> {
        Ok(Self {
            pattern: self.pattern.add(true, length)?,
        })
    }

    /// Appends a plain stretch between teeth.
    pub fn skip(&self, length: f64) -> PatternResult<Self> {
        Ok(Self {
            pattern: self.pattern.add(false, length)?,
        })
    }

    /// The slot openings that receive exactly these teeth: the same pattern
    /// reinterpreted on the mating face.
    pub fn matching_slots(&self) -> SlotsPattern {
        SlotsPattern {
            pattern: self.pattern.clone(),
        }
    }

    /// The complementary toothed edge of a second, mating piece: teeth where
    /// this edge has gaps and vice versa.
    pub fn matching_tabs(&self) -> TabsPattern {
        TabsPattern {
            pattern: self.pattern.invert(),
        }
    }

    /// The same teeth traversed from the other end.
    pub fn reverse(&self) -> Self {
        Self {
            pattern: self.pattern.reverse(),
        }
    }

    pub fn pattern(&self) -> &InterlockPattern {
        &self.pattern
    }

    pub fn into_pattern(self) -> InterlockPattern {
        self.pattern
    }

    pub fn total_length(&self) -> f64 {
        self.pattern.total_length()
    }

    pub fn segments(&self) -> &[PatternSegment] {
        self.pattern.segments()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// A pattern whose active segments are cut openings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotsPattern {
    pattern: InterlockPattern,
}

impl SlotsPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pattern(pattern: InterlockPattern) -> Self {
        Self { pattern }
    }

    /// Appends an opening.
    pub fn open(&self, length: f64) -> PatternResult<Self> {
        Ok(Self {
            pattern: self.pattern.add(true, length)?,
        })
    }

    /// Appends a closed stretch.
    pub fn closed(&self, length: f64) -> PatternResult<Self> {
        Ok(Self {
            pattern: self.pattern.add(false, length)?,
        })
    }

    /// The teeth that insert into exactly these openings: the same pattern
    /// reinterpreted on the mating face.
    pub fn matching_tabs(&self) -> TabsPattern {
        TabsPattern {
            pattern: self.pattern.clone(),
        }
    }

    /// The same openings traversed from the other end.
    pub fn reverse(&self) -> Self {
        Self {
            pattern: self.pattern.reverse(),
        }
    }

    /// Splits a length into two complementary slot patterns for a slide-fit
    /// joint: one opens over its first half, the partner over its second.
    pub fn slide_pair(length: f64) -> PatternResult<(SlotsPattern, SlotsPattern)> {
        if length < 0.0 {
            return Err(PatternError::InvalidLength { length });
        }
        let half = length / 2.0;
        let leading = InterlockPattern::new().add(true, half)?.add(false, half)?;
        let trailing = leading.invert();
        Ok((
            SlotsPattern { pattern: leading },
            SlotsPattern { pattern: trailing },
        ))
    }

    pub fn pattern(&self) -> &InterlockPattern {
        &self.pattern
    }

    pub fn into_pattern(self) -> InterlockPattern {
        self.pattern
    }

    pub fn total_length(&self) -> f64 {
        self.pattern.total_length()
    }

    pub fn segments(&self) -> &[PatternSegment] {
        self.pattern.segments()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}
