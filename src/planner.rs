/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Heading vector → polar move command.
//!
//! The angle is a compass bearing: `atan2(x, y)`, so 0° is straight ahead
//! (`+y`), 90° is to the right (`+x`) and ±180° is behind. Bearings are
//! normalised into the half-open range (−180°, 180°].
//!
//! The magnitude is a fixed step. The cart steers only by angle; the length
//! of the heading vector never changes how far it moves.
//!
//! # Zero heading
//!
//! `atan2(0, 0)` has no geometric meaning. A zero (or non-finite) heading is
//! planned as a 0° move: keep going straight ahead.

use libm::{atan2f, fmodf};

use crate::geometry::HeadingVector;

/// Step size of the reference cart (mm per cycle).
pub const DEFAULT_STEP_MM: f32 = 5.0;

/// One polar move for the motion collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    /// Bearing in degrees, in (−180, 180].
    pub angle_degrees: f32,
    /// Distance to travel, always the configured step.
    pub magnitude: f32,
}

/// Map any angle in degrees into (−180, 180].
///
/// Non-finite input maps to 0.
pub fn normalize_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = fmodf(angle, 360.0);
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Fixed-step planner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionPlanner {
    /// Distance per move (mm).
    pub step_magnitude: f32,
}

impl MotionPlanner {
    /// Construct a planner with the given step (mm).
    pub const fn new(step_magnitude: f32) -> Self {
        Self { step_magnitude }
    }

    /// Bearing of `heading` in degrees, normalised. Zero or non-finite headings give 0.
    pub fn bearing(heading: &HeadingVector) -> f32 {
        if heading.is_zero() || !heading.is_finite() {
            return 0.0;
        }
        normalize_degrees(atan2f(heading.x, heading.y).to_degrees())
    }

    /// Plan the move for one cycle.
    pub fn plan(&self, heading: &HeadingVector) -> MoveCommand {
        MoveCommand {
            angle_degrees: Self::bearing(heading),
            magnitude: self.step_magnitude,
        }
    }
}

impl Default for MotionPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    fn in_range(a: f32) -> bool {
        a > -180.0 && a <= 180.0
    }

    #[test]
    fn test_zero_heading_is_straight_ahead() {
        let cmd = MotionPlanner::default().plan(&HeadingVector::ZERO);
        assert_eq!(cmd.angle_degrees, 0.0);
        assert_eq!(cmd.magnitude, DEFAULT_STEP_MM);
    }

    #[test]
    fn test_axis_aligned_bearings() {
        let cases = [
            (HeadingVector::new(0.0, 1.0), 0.0),
            (HeadingVector::new(1.0, 0.0), 90.0),
            (HeadingVector::new(0.0, -1.0), 180.0),
            (HeadingVector::new(-0.0, -1.0), 180.0),
            (HeadingVector::new(-1.0, 0.0), -90.0),
        ];
        for (h, expected) in cases {
            let a = MotionPlanner::bearing(&h);
            assert!((a - expected).abs() < TOL, "{:?} → {}, expected {}", h, a, expected);
            assert!(in_range(a));
        }
    }

    #[test]
    fn test_right_hand_scenario() {
        let cmd = MotionPlanner::new(5.0).plan(&HeadingVector::new(150.0, 0.0));
        assert!((cmd.angle_degrees - 90.0).abs() < TOL);
        assert_eq!(cmd.magnitude, 5.0);
    }

    #[test]
    fn test_magnitude_independent_of_heading_length() {
        let planner = MotionPlanner::new(7.5);
        let short = planner.plan(&HeadingVector::new(0.001, 0.001));
        let long = planner.plan(&HeadingVector::new(1000.0, 1000.0));
        assert_eq!(short.magnitude, 7.5);
        assert_eq!(long.magnitude, 7.5);
        assert!((short.angle_degrees - 45.0).abs() < TOL);
        assert!((long.angle_degrees - 45.0).abs() < TOL);
    }

    #[test]
    fn test_bearing_always_in_range_around_the_circle() {
        for i in 0..720 {
            let theta = (i as f32) * core::f32::consts::PI / 360.0;
            for r in [0.5f32, 30.0, 1.0e4] {
                let h = HeadingVector::new(r * libm::sinf(theta), r * libm::cosf(theta));
                let a = MotionPlanner::bearing(&h);
                assert!(in_range(a), "theta={} gave {}", theta, a);
            }
        }
    }

    #[test]
    fn test_non_finite_heading_is_straight_ahead() {
        assert_eq!(MotionPlanner::bearing(&HeadingVector::new(f32::NAN, 1.0)), 0.0);
        assert_eq!(MotionPlanner::bearing(&HeadingVector::new(f32::INFINITY, 1.0)), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert!((normalize_degrees(270.0) + 90.0).abs() < TOL);
        assert!((normalize_degrees(-270.0) - 90.0).abs() < TOL);
        assert!((normalize_degrees(725.0) - 5.0).abs() < TOL);
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(f32::NAN), 0.0);
        for i in -2000..2000 {
            assert!(in_range(normalize_degrees(i as f32 * 0.77)));
        }
    }
}
