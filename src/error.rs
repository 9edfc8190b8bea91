//! Error taxonomy for the light-seeking core.
//!
//! Two families with different propagation rules:
//!
//! - **Configuration** errors ([`CartError::ConfigurationMismatch`],
//!   [`CartError::InvalidConfig`]) are fatal. They surface at construction or on
//!   the first cycle and end the run.
//! - **Read** errors ([`CartError::SensorUnavailable`],
//!   [`CartError::HardwareReadError`]) abort the current cycle without a move.
//!   The next cycle is the retry.

use thiserror::Error;

/// Which collaborator a read error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorKind {
    /// The directional light sensor ring (A/D converter).
    Light,
    /// The proximity / clearance sensor.
    Proximity,
}

impl core::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorKind::Light => f.write_str("light"),
            SensorKind::Proximity => f.write_str("proximity"),
        }
    }
}

/// Errors raised by the light-seeking core and its collaborators.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CartError {
    /// Sample count does not match the configured sensor count.
    #[error("configuration mismatch: expected {expected} sensors, got {actual}")]
    ConfigurationMismatch {
        /// Configured sensor count.
        expected: usize,
        /// Count actually supplied.
        actual: usize,
    },

    /// A read returned nothing or the sensor could not be reached.
    #[error("{sensor} sensor unavailable")]
    SensorUnavailable {
        /// The failing sensor.
        sensor: SensorKind,
    },

    /// The collaborator reported a hardware fault or produced an invalid value.
    #[error("{sensor} hardware read error on channel {channel}")]
    HardwareReadError {
        /// The failing sensor.
        sensor: SensorKind,
        /// Channel index of the bad reading.
        channel: usize,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl CartError {
    /// Creates a configuration mismatch error.
    #[must_use]
    pub const fn configuration_mismatch(expected: usize, actual: usize) -> Self {
        Self::ConfigurationMismatch { expected, actual }
    }

    /// Creates a sensor unavailable error.
    #[must_use]
    pub const fn sensor_unavailable(sensor: SensorKind) -> Self {
        Self::SensorUnavailable { sensor }
    }

    /// Creates a hardware read error.
    #[must_use]
    pub const fn hardware_read(sensor: SensorKind, channel: usize) -> Self {
        Self::HardwareReadError { sensor, channel }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub const fn invalid_config(reason: &'static str) -> Self {
        Self::InvalidConfig(reason)
    }

    /// `true` for errors that only abort the current cycle.
    ///
    /// Configuration errors are never recoverable: the geometry or parameters
    /// will be just as wrong on the next cycle.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CartError::SensorUnavailable { .. } | CartError::HardwareReadError { .. }
        )
    }
}

/// Result type for light-seeking operations.
pub type Result<T> = core::result::Result<T, CartError>;
