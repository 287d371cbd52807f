//! Evenly distributed tooth layouts
//!
//! Computes a tooth count for an edge (from an explicit count or a desired
//! tooth spacing), then solves for a single tooth length and a single gap
//! length such that the teeth and the boundary-dependent number of gaps sum
//! exactly to the edge length.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InterlockPattern, TabsPattern};
use crate::error::{PatternError, PatternResult};

const LENGTH_EPSILON: f64 = 1e-9;

/// Layout request for [`TabsPattern::distributed`].
///
/// Either `num_tabs` or `tab_every_len` selects the tooth count; a fixed
/// `tab_length` overrides the tooth:gap ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributedSpec {
    /// Total edge length to fill.
    pub length: f64,
    /// Desired spacing between tooth starts; the count is floored from it.
    pub tab_every_len: Option<f64>,
    /// Explicit tooth count, overriding `tab_every_len`.
    pub num_tabs: Option<usize>,
    /// Lower bound on the tooth count.
    pub min_num_tabs: usize,
    /// Ratio of tooth length to gap length when `tab_length` is not fixed.
    pub tab_to_skip_ratio: f64,
    /// Fixed tooth length; gaps absorb the remainder.
    pub tab_length: Option<f64>,
    /// Begin the edge with a tooth instead of a gap.
    pub start_with_tab: bool,
    /// End the edge with a tooth instead of a gap.
    pub end_with_tab: bool,
}

impl Default for DistributedSpec {
    fn default() -> Self {
        Self {
            length: 0.0,
            tab_every_len: None,
            num_tabs: None,
            min_num_tabs: 2,
            tab_to_skip_ratio: 1.0,
            tab_length: None,
            start_with_tab: false,
            end_with_tab: false,
        }
    }
}

impl DistributedSpec {
    fn tab_count(&self) -> usize {
        let derived = match (self.num_tabs, self.tab_every_len) {
            (Some(n), _) => n,
            (None, Some(every)) if every > 0.0 => (self.length / every).floor() as usize,
            _ => 0,
        };
        derived.max(self.min_num_tabs)
    }

    fn gap_count(&self, tabs: usize) -> i64 {
        let mut gaps = tabs as i64 - 1;
        if !self.start_with_tab {
            gaps += 1;
        }
        if !self.end_with_tab {
            gaps += 1;
        }
        gaps
    }
}

impl TabsPattern {
    /// Lays out `count` equal teeth separated by equal gaps over
    /// `spec.length`, honoring the boundary flags.
    ///
    /// Fails with [`PatternError::InvalidCount`] when the derived tooth/gap
    /// count cannot be satisfied and [`PatternError::InvalidLength`] when a
    /// solved length comes out negative.
    pub fn distributed(spec: &DistributedSpec) -> PatternResult<TabsPattern> {
        if spec.length < 0.0 {
            return Err(PatternError::InvalidLength {
                length: spec.length,
            });
        }

        let tabs = spec.tab_count();
        let gaps = spec.gap_count(tabs);
        if gaps < 0 || (tabs as i64 + gaps == 0 && spec.length > 0.0) {
            return Err(PatternError::InvalidCount { tabs, gaps });
        }

        let (tab_length, gap_length) = solve_lengths(spec, tabs, gaps)?;
        debug!(tabs, gaps, tab_length, gap_length, "distributed tab layout");

        let mut pattern = InterlockPattern::new();
        let total_runs = tabs as i64 + gaps;
        for i in 0..total_runs {
            let is_tab = (i % 2 == 0) == spec.start_with_tab;
            let run = if is_tab { tab_length } else { gap_length };
            pattern = pattern.add(is_tab, run)?;
        }
        Ok(TabsPattern::from_pattern(pattern))
    }
}

fn solve_lengths(spec: &DistributedSpec, tabs: usize, gaps: i64) -> PatternResult<(f64, f64)> {
    if let Some(tab_length) = spec.tab_length {
        if tab_length < 0.0 {
            return Err(PatternError::InvalidLength { length: tab_length });
        }
        let remainder = spec.length - tabs as f64 * tab_length;
        if gaps == 0 {
            // No gaps to absorb a remainder; the teeth must fill the edge.
            if remainder.abs() > LENGTH_EPSILON {
                return Err(PatternError::InvalidCount { tabs, gaps });
            }
            return Ok((tab_length, 0.0));
        }
        let gap_length = remainder / gaps as f64;
        if gap_length < -LENGTH_EPSILON {
            return Err(PatternError::InvalidLength { length: gap_length });
        }
        Ok((tab_length, gap_length.max(0.0)))
    } else {
        let ratio = spec.tab_to_skip_ratio;
        if ratio <= 0.0 {
            return Err(PatternError::InvalidLength { length: ratio });
        }
        let denominator = tabs as f64 * ratio + gaps as f64;
        let gap_length = spec.length / denominator;
        Ok((ratio * gap_length, gap_length))
    }
}
