//! Planar geometry of the cart: sensor positions, the sensor ring and heading vectors.
//!
//! Coordinates are millimetres in the cart frame. `+y` is the cart's front and
//! `+x` its right-hand side, so bearings are measured clockwise from `+y`.
//!
//! The reference cart carries eight sensors on a 30 mm ring, starting at the
//! front and stepping clockwise:
//!
//! ```text
//!            (0, 30)
//!   (-21, 21)   |   (21, 21)
//! (-30, 0) -----+----- (30, 0)
//!   (-21,-21)   |   (21,-21)
//!            (0,-30)
//! ```

use heapless::Vec as HVec;
use libm::{cosf, sinf, sqrtf};

use crate::error::{CartError, Result};

/// Maximum number of light sensors on one ring.
pub const MAX_SENSORS: usize = 32;

/// Ring radius of the reference cart (mm).
pub const REFERENCE_RADIUS_MM: f32 = 30.0;

/// Sensor count of the reference cart.
pub const REFERENCE_SENSOR_COUNT: usize = 8;

const _: () = assert!(REFERENCE_SENSOR_COUNT >= 1 && REFERENCE_SENSOR_COUNT <= MAX_SENSORS);

/// Fixed position of one light sensor relative to the cart centre (mm).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorPosition {
    /// Lateral offset (mm), positive to the right.
    pub x: f32,
    /// Longitudinal offset (mm), positive to the front.
    pub y: f32,
}

impl SensorPosition {
    /// Construct a position from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Position at `radius` mm along the compass `bearing` (radians clockwise from `+y`).
    pub fn on_circle(radius: f32, bearing: f32) -> Self {
        Self {
            x: radius * sinf(bearing),
            y: radius * cosf(bearing),
        }
    }

    /// Distance from the cart centre.
    pub fn radius(&self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y)
    }
}

/// Two-dimensional heading estimate, not normalised to unit length.
///
/// The zero vector is a meaningful result: no preferred direction.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingVector {
    /// Lateral component.
    pub x: f32,
    /// Longitudinal component.
    pub y: f32,
}

impl HeadingVector {
    /// The zero heading.
    pub const ZERO: HeadingVector = HeadingVector { x: 0.0, y: 0.0 };

    /// Construct a heading from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y)
    }

    /// `true` when both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// `true` when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Add `weight × position` to this heading.
    pub(crate) fn accumulate(&mut self, weight: f32, position: &SensorPosition) {
        self.x += weight * position.x;
        self.y += weight * position.y;
    }
}

/// The static arrangement of light sensors, in the order the A/D reports them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorRing {
    positions: HVec<SensorPosition, MAX_SENSORS>,
}

impl SensorRing {
    /// Build a ring from an explicit position table.
    ///
    /// Fails with [`CartError::InvalidConfig`] for an empty table or one
    /// longer than [`MAX_SENSORS`].
    pub fn from_positions(positions: &[SensorPosition]) -> Result<Self> {
        if positions.is_empty() {
            return Err(CartError::invalid_config("sensor ring needs at least one sensor"));
        }
        let positions = HVec::from_slice(positions)
            .map_err(|_| CartError::invalid_config("too many sensor positions"))?;
        Ok(Self { positions })
    }

    /// `count` sensors evenly spaced on a circle of `radius` mm, the first at
    /// the front and the rest stepping clockwise.
    pub fn circular(count: usize, radius: f32) -> Result<Self> {
        if count == 0 || count > MAX_SENSORS {
            return Err(CartError::invalid_config("sensor count out of range"));
        }
        Ok(Self::evenly_spaced(count, radius))
    }

    /// The eight-sensor, 30 mm ring of the reference cart.
    pub fn reference() -> Self {
        Self::evenly_spaced(REFERENCE_SENSOR_COUNT, REFERENCE_RADIUS_MM)
    }

    /// Caller guarantees `1 <= count <= MAX_SENSORS`.
    fn evenly_spaced(count: usize, radius: f32) -> Self {
        let step = core::f32::consts::TAU / count as f32;
        let positions = (0..count)
            .take(MAX_SENSORS)
            .map(|i| SensorPosition::on_circle(radius, step * i as f32))
            .collect();
        Self { positions }
    }

    /// Number of sensors.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` when the ring has no sensors. Never the case for a constructed ring.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in reporting order.
    pub fn positions(&self) -> &[SensorPosition] {
        &self.positions
    }
}

impl Default for SensorRing {
    fn default() -> Self {
        Self::reference()
    }
}
