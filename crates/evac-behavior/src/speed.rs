//! Visibility-driven desired walking speed.
//!
//! ```text
//! speed(v) = 0                                         if v <= c0
//!          = v_max · (1 − exp(−(v − c0) / range))      otherwise
//! ```
//!
//! The curve starts at exactly zero on the threshold and approaches `v_max`
//! asymptotically.  Its slope jumps at the threshold; that kink is part of
//! the model.
//!
//! The result never exceeds `v_max`.  In `f64` it rounds to exactly `v_max`
//! once `(v − c0) / range` passes about 37, so callers may only rely on
//! `speed <= v_max`, not on a strict inequality.

use crate::{BehaviorError, BehaviorResult};

/// Desired speed for local visibility `visibility`.
///
/// A NaN visibility is treated as "at or below threshold" and yields `0.0`.
///
/// # Errors
///
/// [`BehaviorError::InvalidConfiguration`] if `falloff_range` is not a
/// positive finite number.
pub fn desired_speed(
    visibility:    f64,
    threshold:     f64,
    max_speed:     f64,
    falloff_range: f64,
) -> BehaviorResult<f64> {
    check_falloff(falloff_range)?;
    Ok(curve(visibility, threshold, max_speed, falloff_range))
}

#[inline]
fn curve(visibility: f64, threshold: f64, max_speed: f64, falloff_range: f64) -> f64 {
    if !(visibility > threshold) {
        return 0.0;
    }
    max_speed * (1.0 - (-(visibility - threshold) / falloff_range).exp())
}

fn check_falloff(falloff_range: f64) -> BehaviorResult<()> {
    if falloff_range > 0.0 && falloff_range.is_finite() {
        Ok(())
    } else {
        Err(BehaviorError::InvalidConfiguration(format!(
            "speed falloff range must be positive, got {falloff_range}"
        )))
    }
}

// ── SpeedModel ────────────────────────────────────────────────────────────────

/// Validated parameters of the speed curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedModel {
    threshold:     f64,
    max_speed:     f64,
    falloff_range: f64,
}

impl SpeedModel {
    pub fn new(threshold: f64, max_speed: f64, falloff_range: f64) -> BehaviorResult<Self> {
        check_falloff(falloff_range)?;
        if !threshold.is_finite() {
            return Err(BehaviorError::InvalidConfiguration(format!(
                "visibility threshold must be finite, got {threshold}"
            )));
        }
        if !(max_speed >= 0.0) || !max_speed.is_finite() {
            return Err(BehaviorError::InvalidConfiguration(format!(
                "max speed must be non-negative, got {max_speed}"
            )));
        }
        Ok(Self { threshold, max_speed, falloff_range })
    }

    /// Visibility (m) at or below which agents stop.  Also used as the
    /// visibility factor when measuring local visibility for the speed.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn falloff_range(&self) -> f64 {
        self.falloff_range
    }

    #[inline]
    pub fn speed(&self, visibility: f64) -> f64 {
        curve(visibility, self.threshold, self.max_speed, self.falloff_range)
    }
}

impl Default for SpeedModel {
    /// `c0 = 3 m`, `v_max = 1 m/s`, `range = 5 m`.
    fn default() -> Self {
        Self { threshold: 3.0, max_speed: 1.0, falloff_range: 5.0 }
    }
}
