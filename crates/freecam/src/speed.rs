//! Freecam speed dial (1–10) and the movement multipliers derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slowest selectable speed.
pub const MIN_SPEED: i32 = 1;
/// Fastest selectable speed.
pub const MAX_SPEED: i32 = 10;
/// Speed of a fresh session.
pub const DEFAULT_SPEED: i32 = 5;

/// Bounds `raw` to `[MIN_SPEED, MAX_SPEED]`. Total, never fails.
pub fn clamp(raw: i64) -> i32 {
    raw.clamp(MIN_SPEED as i64, MAX_SPEED as i64) as i32
}

/// Movement multipliers sent to the client camera controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    /// Applied to both horizontal axes.
    pub horizontal: f32,
    pub vertical: f32,
}

/// Derives the movement multipliers for a speed.
///
/// Horizontal scales linearly with the dial. Vertical scales gently and never
/// drops below 0.5.
pub fn multipliers(speed: Speed) -> Multipliers {
    let s = speed.get() as f32;
    Multipliers {
        horizontal: f32::max(1.0, s),
        vertical: f32::max(0.5, 0.4 + s * 0.12),
    }
}

/// A speed value that is always inside `[MIN_SPEED, MAX_SPEED]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i32")]
pub struct Speed(i32);

impl Speed {
    /// Clamping constructor.
    pub fn new(raw: i64) -> Self {
        Self(clamp(raw))
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub fn multipliers(self) -> Multipliers {
        multipliers(self)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

impl From<i64> for Speed {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl From<Speed> for i32 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(i64::MIN), MIN_SPEED);
        assert_eq!(clamp(-3), 1);
        assert_eq!(clamp(0), 1);
        assert_eq!(clamp(11), 10);
        assert_eq!(clamp(i64::MAX), MAX_SPEED);
    }

    #[test]
    fn test_clamp_identity_in_range_and_idempotent() {
        for x in -20..=30i64 {
            let once = clamp(x);
            assert_eq!(clamp(once as i64), once);
            if (1..=10).contains(&x) {
                assert_eq!(once as i64, x);
            }
        }
    }

    #[test]
    fn test_multipliers_formula() {
        for s in MIN_SPEED..=MAX_SPEED {
            let m = Speed::new(s as i64).multipliers();
            assert_eq!(m.horizontal, f32::max(1.0, s as f32));
            assert_eq!(m.vertical, f32::max(0.5, 0.4 + s as f32 * 0.12));
        }
    }

    #[test]
    fn test_vertical_is_monotonic() {
        let mut last = 0.0f32;
        for s in MIN_SPEED..=MAX_SPEED {
            let v = Speed::new(s as i64).multipliers().vertical;
            assert!(v >= last, "vertical dropped at speed {s}");
            last = v;
        }
    }

    #[test]
    fn test_known_values() {
        let m = Speed::new(5).multipliers();
        assert_eq!(m.horizontal, 5.0);
        assert!((m.vertical - 1.0).abs() < 1e-6);

        let m = Speed::new(8).multipliers();
        assert_eq!(m.horizontal, 8.0);
        assert!((m.vertical - 1.36).abs() < 1e-6);

        // Floor kicks in at the slow end.
        assert!((Speed::new(1).multipliers().vertical - 0.52).abs() < 1e-6);
    }

    #[test]
    fn test_default_speed() {
        assert_eq!(Speed::default().get(), DEFAULT_SPEED);
    }
}
