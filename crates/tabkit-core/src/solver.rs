//! 1-D sign-change root finder
//!
//! Back-solves an unknown scalar parameter from a desired geometric outcome:
//! starting at the lower end of the interval, the search step doubles until a
//! sign change of the objective is bracketed, then binary subdivision narrows
//! the bracket down to the requested resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Search configuration for [`solve_for_zero`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Lower end of the search interval.
    pub min: f64,
    /// Upper end of the search interval.
    pub max: f64,
    /// Stop subdividing once the bracket is narrower than this.
    pub resolution: f64,
    /// Initial expansion step.
    pub start_step: f64,
    /// Cap for the doubling expansion step.
    pub max_step: f64,
    /// Returned instead of an error when no sign change is found.
    pub value_on_not_found: Option<f64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1_000.0,
            resolution: 1e-6,
            start_step: 1e-3,
            max_step: 64.0,
            value_on_not_found: None,
        }
    }
}

/// Finds an `x` in `[options.min, options.max]` with `f(x) ~= 0`.
///
/// The search walks up from `min` with a doubling step (capped at
/// `max_step`) until `f` changes sign between two probes, then bisects the
/// bracket until it is narrower than `resolution`. Without a bracketed sign
/// change the configured fallback value is returned, or
/// [`SolverError::NoZeroFound`] reporting the interval endpoints.
pub fn solve_for_zero<F>(f: F, options: &SolveOptions) -> SolverResult<f64>
where
    F: Fn(f64) -> f64,
{
    let f_min = f(options.min);
    if f_min == 0.0 {
        return Ok(options.min);
    }

    let mut lo = options.min;
    let mut f_lo = f_min;
    let mut step = options.start_step;

    loop {
        let hi = (lo + step).min(options.max);
        let f_hi = f(hi);

        if f_lo * f_hi <= 0.0 {
            debug!(lo, hi, "bracketed sign change");
            return Ok(bisect(&f, lo, hi, f_lo, options.resolution));
        }

        if hi >= options.max {
            if let Some(fallback) = options.value_on_not_found {
                debug!(fallback, "no sign change found, using fallback value");
                return Ok(fallback);
            }
            return Err(SolverError::NoZeroFound {
                min: options.min,
                max: options.max,
                f_min,
                f_max: f_hi,
            });
        }

        lo = hi;
        f_lo = f_hi;
        step = (step * 2.0).min(options.max_step);
    }
}

fn bisect<F>(f: &F, mut lo: f64, mut hi: f64, mut f_lo: f64, resolution: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    while hi - lo > resolution {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    0.5 * (lo + hi)
}
