//! Startup parameter set for the control loop.
//!
//! [`CartConfig::default`] describes the reference cart:
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | `sensor_count` | 8 |
//! | `sensor_positions` | 30 mm ring, front first, clockwise |
//! | `min_clearance` | 30 mm |
//! | `dwell_duration` | 15 minutes |
//! | `trend_lag` | 3 |
//! | `step_magnitude` | 5 mm |
//!
//! With the `serde` feature the config deserialises from any serde format, so
//! the startup wiring can keep it in a file. Missing fields take their
//! defaults; call [`CartConfig::validate`] on anything loaded.

use core::time::Duration;

use crate::error::{CartError, Result};
use crate::geometry::{SensorPosition, SensorRing, REFERENCE_SENSOR_COUNT};
use crate::planner::DEFAULT_STEP_MM;
use crate::safety::DEFAULT_MIN_CLEARANCE_MM;
use crate::trend::{DEFAULT_TREND_LAG, MAX_TREND_LAG};

/// Dwell of the reference cart once it passes a light maximum.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(15 * 60);

/// Fixed parameter set consumed by [`ControlLoop`](crate::control::ControlLoop).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CartConfig {
    /// Number of light sensors the A/D reports.
    pub sensor_count: usize,
    /// Sensor positions in A/D channel order.
    pub sensor_positions: SensorRing,
    /// Every clearance must strictly exceed this for a move (mm).
    pub min_clearance: f32,
    /// Pause at a discovered optimum.
    pub dwell_duration: Duration,
    /// Length of the trailing intensity window.
    pub trend_lag: usize,
    /// Distance travelled per move (mm).
    pub step_magnitude: f32,
}

impl CartConfig {
    /// Reference configuration with a different sensor table.
    ///
    /// `sensor_count` follows the table.
    pub fn with_positions(positions: &[SensorPosition]) -> Result<Self> {
        let ring = SensorRing::from_positions(positions)?;
        Ok(Self {
            sensor_count: ring.len(),
            sensor_positions: ring,
            ..Self::default()
        })
    }

    /// Check every parameter.
    ///
    /// - `sensor_count` ≠ number of positions → [`CartError::ConfigurationMismatch`]
    /// - anything else out of range → [`CartError::InvalidConfig`]
    pub fn validate(&self) -> Result<()> {
        if self.sensor_positions.is_empty() {
            return Err(CartError::invalid_config("sensor ring needs at least one sensor"));
        }
        if self.sensor_count != self.sensor_positions.len() {
            return Err(CartError::configuration_mismatch(
                self.sensor_count,
                self.sensor_positions.len(),
            ));
        }
        if self
            .sensor_positions
            .positions()
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(CartError::invalid_config("sensor positions must be finite"));
        }
        if !self.min_clearance.is_finite() || self.min_clearance < 0.0 {
            return Err(CartError::invalid_config("min_clearance must be finite and non-negative"));
        }
        if !self.step_magnitude.is_finite() || self.step_magnitude <= 0.0 {
            return Err(CartError::invalid_config("step_magnitude must be positive"));
        }
        if self.trend_lag == 0 || self.trend_lag > MAX_TREND_LAG {
            return Err(CartError::invalid_config("trend_lag out of range"));
        }
        Ok(())
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            sensor_count: REFERENCE_SENSOR_COUNT,
            sensor_positions: SensorRing::reference(),
            min_clearance: DEFAULT_MIN_CLEARANCE_MM,
            dwell_duration: DEFAULT_DWELL,
            trend_lag: DEFAULT_TREND_LAG,
            step_magnitude: DEFAULT_STEP_MM,
        }
    }
}
