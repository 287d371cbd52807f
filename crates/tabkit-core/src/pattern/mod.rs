//! Tab/slot interlock pattern algebra
//!
//! An interlock pattern is an ordered run of alternating active/inactive
//! segments along one edge: for a toothed edge the active segments are the
//! teeth, for a slotted edge they are the openings. Patterns are immutable
//! values; every operation returns a new pattern.

mod distributed;
mod tabs;

pub use distributed::DistributedSpec;
pub use tabs::{SlotsPattern, TabsPattern};

use serde::{Deserialize, Serialize};

use crate::error::{PatternError, PatternResult};

/// One run of an interlock pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternSegment {
    /// Whether this run is a tooth/opening (`true`) or a plain stretch.
    pub active: bool,
    /// Length of the run, always positive.
    pub length: f64,
}

/// An ordered sequence of alternating segments.
///
/// Invariant: no two adjacent segments share the same `active` flag —
/// same-flag additions merge into the previous segment at construction time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterlockPattern {
    segments: Vec<PatternSegment>,
}

impl InterlockPattern {
    /// Creates an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pattern by folding [`InterlockPattern::add`] over `(active, length)` pairs.
    pub fn from_segments<I>(segments: I) -> PatternResult<Self>
    where
        I: IntoIterator<Item = (bool, f64)>,
    {
        let mut pattern = Self::new();
        for (active, length) in segments {
            pattern = pattern.add(active, length)?;
        }
        Ok(pattern)
    }

    /// Appends a run, merging into the previous segment when the flag matches.
    ///
    /// A zero length is a no-op; a negative length fails with
    /// [`PatternError::InvalidLength`].
    pub fn add(&self, active: bool, length: f64) -> PatternResult<Self> {
        if length < 0.0 {
            return Err(PatternError::InvalidLength { length });
        }
        let mut next = self.clone();
        if length > 0.0 {
            next.push_merged(active, length);
        }
        Ok(next)
    }

    /// Appends every segment of `other` in order.
    pub fn add_pattern(&self, other: &InterlockPattern) -> Self {
        let mut next = self.clone();
        for segment in &other.segments {
            next.push_merged(segment.active, segment.length);
        }
        next
    }

    /// Reverses the traversal order; each segment keeps its own flag.
    pub fn reverse(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.reverse();
        Self { segments }
    }

    /// Flips every segment's `active` flag; lengths and order are unchanged.
    ///
    /// Used to compute the complementary edge of a mating piece.
    pub fn invert(&self) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|s| PatternSegment {
                active: !s.active,
                length: s.length,
            })
            .collect();
        Self { segments }
    }

    /// Sum of all segment lengths.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// The segments in traversal order.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Number of (merged) segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push_merged(&mut self, active: bool, length: f64) {
        match self.segments.last_mut() {
            Some(last) if last.active == active => last.length += length,
            _ => self.segments.push(PatternSegment { active, length }),
        }
    }
}
