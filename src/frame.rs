//! One cycle's light readings paired with the sensor geometry.

use heapless::Vec as HVec;

use crate::error::{CartError, Result, SensorKind};
use crate::geometry::{SensorPosition, SensorRing, MAX_SENSORS};

/// One light reading tagged with the position of the sensor that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightSample {
    /// Non-negative light amplitude.
    pub amplitude: f32,
    /// Fixed sensor position (mm).
    pub position: SensorPosition,
}

/// All light samples of a single cycle, in ring order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorFrame {
    samples: HVec<LightSample, MAX_SENSORS>,
}

impl SensorFrame {
    /// Zip raw amplitudes with the ring positions.
    ///
    /// - empty `amplitudes` → [`CartError::SensorUnavailable`]
    /// - length differs from the ring → [`CartError::ConfigurationMismatch`]
    /// - a negative or non-finite amplitude → [`CartError::HardwareReadError`] on that channel
    pub fn build(ring: &SensorRing, amplitudes: &[f32]) -> Result<Self> {
        if amplitudes.is_empty() {
            return Err(CartError::sensor_unavailable(SensorKind::Light));
        }
        if amplitudes.len() != ring.len() {
            return Err(CartError::configuration_mismatch(ring.len(), amplitudes.len()));
        }

        let mut samples = HVec::new();
        for (channel, (&amplitude, &position)) in
            amplitudes.iter().zip(ring.positions().iter()).enumerate()
        {
            if !amplitude.is_finite() || amplitude < 0.0 {
                return Err(CartError::hardware_read(SensorKind::Light, channel));
            }
            // Ring length bounds the frame length.
            let _ = samples.push(LightSample { amplitude, position });
        }
        Ok(Self { samples })
    }

    /// Samples in ring order.
    pub fn samples(&self) -> &[LightSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` for a frame without samples (never produced by [`SensorFrame::build`]).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sum of all amplitudes.
    pub fn total_intensity(&self) -> f32 {
        self.samples.iter().map(|s| s.amplitude).sum()
    }
}
