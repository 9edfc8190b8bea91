/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Heading estimation from a directional sensor ring.
//!
//! Each sensor's fixed position doubles as its pointing direction, scaled by
//! the ring radius. The heading is the amplitude-weighted vector sum:
//!
//! ```text
//! heading = Σᵢ amplitudeᵢ · positionᵢ
//! ```
//!
//! No normalisation step: the radius is common to every sensor, so it scales
//! the result without turning it. Amplitude is the only weight.
//!
//! # Invariants
//!
//! - Equal amplitudes on a symmetric ring sum to ≈ (0, 0): no preferred direction.
//! - All-zero amplitudes give exactly (0, 0).
//! - One lit sensor with amplitude `A` gives `A × position`.
//! - Never fails; degenerate input yields the zero vector.
//! - A heading no longer than `N · f32::EPSILON · Σ amplitudeᵢ · |positionᵢ|`
//!   (see [`rounding_bound`]) is rounding residue from a balanced frame and is
//!   reported as exactly zero. Any real imbalance is far above that bound.

use crate::frame::SensorFrame;
use crate::geometry::HeadingVector;

/// Worst-case f32 rounding error of an `n`-term weighted sum whose terms have
/// total magnitude `scale`.
pub fn rounding_bound(n: usize, scale: f32) -> f32 {
    n as f32 * f32::EPSILON * scale
}

/// Stateless reducer from a [`SensorFrame`] to a [`HeadingVector`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionFinder;

impl DirectionFinder {
    /// Construct the direction finder.
    pub const fn new() -> Self {
        Self
    }

    /// Estimate the direction of increasing light for one frame.
    pub fn find(&self, frame: &SensorFrame) -> HeadingVector {
        let mut heading = HeadingVector::ZERO;
        let mut scale = 0.0f32;
        for sample in frame.samples() {
            heading.accumulate(sample.amplitude, &sample.position);
            scale += sample.amplitude * sample.position.radius();
        }
        if heading.magnitude() <= rounding_bound(frame.len(), scale) {
            return HeadingVector::ZERO;
        }
        heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{SensorPosition, SensorRing};

    const TOL: f32 = 1e-3;

    fn frame(ring: &SensorRing, amps: &[f32]) -> SensorFrame {
        SensorFrame::build(ring, amps).unwrap()
    }

    #[test]
    fn test_uniform_amplitude_cancels() {
        let ring = SensorRing::reference();
        let h = DirectionFinder::new().find(&frame(&ring, &[10.0; 8]));
        assert_eq!(h, HeadingVector::ZERO);
    }

    #[test]
    fn test_symmetry_holds_for_any_ring_size() {
        for n in 1..=16usize {
            let ring = SensorRing::circular(n, 30.0).unwrap();
            let amps = [7.5f32; 16];
            let h = DirectionFinder::new().find(&frame(&ring, &amps[..n]));
            if n == 1 {
                // A single sensor has no opposite partner; it points at itself.
                assert!((h.y - 225.0).abs() < TOL);
            } else {
                // Per-term magnitude is 225; allow for f32 rounding of the ring angles.
                assert!(h.magnitude() < 1e-2, "n={} heading {:?}", n, h);
            }
        }
    }

    #[test]
    fn test_all_zero_is_exact_zero() {
        let ring = SensorRing::reference();
        let h = DirectionFinder::new().find(&frame(&ring, &[0.0; 8]));
        assert_eq!(h, HeadingVector::ZERO);
    }

    #[test]
    fn test_single_source_dominance() {
        let ring = SensorRing::reference();
        for lit in 0..8 {
            let mut amps = [0.0f32; 8];
            amps[lit] = 4.0;
            let h = DirectionFinder::new().find(&frame(&ring, &amps));
            let p = ring.positions()[lit];
            assert!((h.x - 4.0 * p.x).abs() < TOL);
            assert!((h.y - 4.0 * p.y).abs() < TOL);
        }
    }

    #[test]
    fn test_right_hand_sensor_scenario() {
        // Sensor at (30, 0) with amplitude 5, everything else dark.
        let ring = SensorRing::from_positions(&[
            SensorPosition::new(0.0, 30.0),
            SensorPosition::new(30.0, 0.0),
            SensorPosition::new(0.0, -30.0),
            SensorPosition::new(-30.0, 0.0),
        ])
        .unwrap();
        let h = DirectionFinder::new().find(&frame(&ring, &[0.0, 5.0, 0.0, 0.0]));
        assert_eq!(h, HeadingVector::new(150.0, 0.0));
    }

    #[test]
    fn test_small_real_imbalance_survives_snapping() {
        let ring = SensorRing::reference();
        let mut amps = [10.0f32; 8];
        amps[2] = 10.5;
        let h = DirectionFinder::new().find(&frame(&ring, &amps));
        assert!((h.x - 15.0).abs() < TOL, "heading {:?}", h);
        assert!(h.y.abs() < TOL);
    }

    #[test]
    fn test_sub_count_imbalance_at_adc_scale() {
        // 10-bit A/D range: half a count more on the right must still steer right.
        let ring = SensorRing::reference();
        let mut amps = [1000.0f32; 8];
        amps[2] = 1000.5;
        let h = DirectionFinder::new().find(&frame(&ring, &amps));
        assert!((h.x - 15.0).abs() < 0.05, "heading {:?}", h);
        let bearing = crate::planner::MotionPlanner::bearing(&h);
        assert!((bearing - 90.0).abs() < 0.1, "bearing {}", bearing);
    }

    #[test]
    fn test_uniform_adc_scale_frame_is_still_zero() {
        let ring = SensorRing::reference();
        let h = DirectionFinder::new().find(&frame(&ring, &[1000.0; 8]));
        assert_eq!(h, HeadingVector::ZERO);
    }

    #[test]
    fn test_rounding_bound_scales_with_terms() {
        assert_eq!(rounding_bound(0, 100.0), 0.0);
        assert!(rounding_bound(8, 240.0) < 1e-3);
        assert!(rounding_bound(16, 240.0) > rounding_bound(8, 240.0));
    }

    #[test]
    fn test_brighter_side_wins() {
        let ring = SensorRing::reference();
        // Front half brighter than the back half.
        let amps = [9.0, 6.0, 3.0, 1.0, 0.5, 1.0, 3.0, 6.0];
        let h = DirectionFinder::new().find(&frame(&ring, &amps));
        assert!(h.y > 0.0);
        assert!(h.x.abs() < TOL, "left/right symmetric input, got x={}", h.x);
    }
}
