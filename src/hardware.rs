//! Capability traits for the cart's hardware collaborators.
//!
//! The control loop never names a concrete driver. A backend supplies three
//! capabilities:
//!
//! | Trait | Capability | Reference hardware |
//! |-------|------------|--------------------|
//! | [`LightSensor`] | read one amplitude per ring sensor | MCP3008 8-channel A/D |
//! | [`ProximitySensor`] | read one clearance per beam (mm) | ranging sensor |
//! | [`MotionActuator`] | fire-and-forget polar move | cart motor driver |
//!
//! Anything implementing all three is a [`CartHardware`]. Separate drivers
//! can be bundled into one backend with [`Hardware`].
//!
//! # Implementing for a new platform
//!
//! ```rust,ignore
//! use phototaxis_core::hardware::{Amplitudes, LightSensor};
//! use phototaxis_core::error::{CartError, Result, SensorKind};
//!
//! struct Mcp3008 { /* spi handle */ }
//!
//! impl LightSensor for Mcp3008 {
//!     fn get_samples(&mut self) -> Result<Amplitudes> {
//!         let mut out = Amplitudes::new();
//!         for ch in 0..8 {
//!             let raw = self.read_channel(ch)
//!                 .map_err(|_| CartError::hardware_read(SensorKind::Light, ch))?;
//!             let _ = out.push(raw as f32);
//!         }
//!         Ok(out)
//!     }
//! }
//! ```

use heapless::Vec as HVec;

use crate::error::Result;
use crate::geometry::MAX_SENSORS;

/// Maximum number of proximity beams in one reading.
pub const MAX_BEAMS: usize = 16;

/// Raw light amplitudes, one per ring sensor, in ring order.
pub type Amplitudes = HVec<f32, MAX_SENSORS>;

/// Clearance distances (mm), one per proximity beam.
pub type Clearances = HVec<f32, MAX_BEAMS>;

/// Directional light sensor ring.
pub trait LightSensor {
    /// Read every channel once.
    ///
    /// Must return amplitudes in the same order as the configured sensor
    /// positions. A hardware fault is reported as an error, never papered over
    /// with default values.
    fn get_samples(&mut self) -> Result<Amplitudes>;
}

/// Proximity sensor.
pub trait ProximitySensor {
    /// Read every beam once. Order and count must be stable across calls.
    fn measure(&mut self) -> Result<Clearances>;
}

/// Motion actuator.
pub trait MotionActuator {
    /// Move `magnitude` mm along the compass bearing `angle_degrees`.
    ///
    /// Fire and forget: the caller does not wait for or verify completion.
    fn make_a_move(&mut self, angle_degrees: f32, magnitude: f32);
}

/// A complete cart backend: the union of the three capabilities.
pub trait CartHardware: LightSensor + ProximitySensor + MotionActuator {}

impl<T: LightSensor + ProximitySensor + MotionActuator> CartHardware for T {}

/// Bundle of three independent drivers acting as one [`CartHardware`].
#[derive(Debug)]
pub struct Hardware<L, P, M> {
    /// Light sensor driver.
    pub light: L,
    /// Proximity sensor driver.
    pub proximity: P,
    /// Motion driver.
    pub motion: M,
}

impl<L, P, M> Hardware<L, P, M> {
    /// Bundle three drivers.
    pub fn new(light: L, proximity: P, motion: M) -> Self {
        Self {
            light,
            proximity,
            motion,
        }
    }
}

impl<L: LightSensor, P, M> LightSensor for Hardware<L, P, M> {
    fn get_samples(&mut self) -> Result<Amplitudes> {
        self.light.get_samples()
    }
}

impl<L, P: ProximitySensor, M> ProximitySensor for Hardware<L, P, M> {
    fn measure(&mut self) -> Result<Clearances> {
        self.proximity.measure()
    }
}

impl<L, P, M: MotionActuator> MotionActuator for Hardware<L, P, M> {
    fn make_a_move(&mut self, angle_degrees: f32, magnitude: f32) {
        self.motion.make_a_move(angle_degrees, magnitude)
    }
}

impl<T: LightSensor + ?Sized> LightSensor for &mut T {
    fn get_samples(&mut self) -> Result<Amplitudes> {
        (**self).get_samples()
    }
}

impl<T: ProximitySensor + ?Sized> ProximitySensor for &mut T {
    fn measure(&mut self) -> Result<Clearances> {
        (**self).measure()
    }
}

impl<T: MotionActuator + ?Sized> MotionActuator for &mut T {
    fn make_a_move(&mut self, angle_degrees: f32, magnitude: f32) {
        (**self).make_a_move(angle_degrees, magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CartError, SensorKind};

    struct FixedLight([f32; 3]);
    struct NoBeams;
    #[derive(Default)]
    struct MoveLog(Option<(f32, f32)>);

    impl LightSensor for FixedLight {
        fn get_samples(&mut self) -> Result<Amplitudes> {
            Ok(HVec::from_slice(&self.0).unwrap())
        }
    }

    impl ProximitySensor for NoBeams {
        fn measure(&mut self) -> Result<Clearances> {
            Err(CartError::sensor_unavailable(SensorKind::Proximity))
        }
    }

    impl MotionActuator for MoveLog {
        fn make_a_move(&mut self, angle_degrees: f32, magnitude: f32) {
            self.0 = Some((angle_degrees, magnitude));
        }
    }

    fn assert_cart<H: CartHardware>(_: &H) {}

    #[test]
    fn test_bundle_delegates_each_capability() {
        let mut hw = Hardware::new(FixedLight([1.0, 2.0, 3.0]), NoBeams, MoveLog::default());
        assert_cart(&hw);

        assert_eq!(hw.get_samples().unwrap().as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(
            hw.measure().unwrap_err(),
            CartError::sensor_unavailable(SensorKind::Proximity)
        );
        hw.make_a_move(-45.0, 5.0);
        assert_eq!(hw.motion.0, Some((-45.0, 5.0)));
    }

    #[test]
    fn test_mut_reference_is_a_backend() {
        let mut hw = Hardware::new(FixedLight([0.0; 3]), NoBeams, MoveLog::default());
        {
            let borrowed = &mut hw;
            assert_cart(&borrowed);
            borrowed.make_a_move(10.0, 1.0);
        }
        assert_eq!(hw.motion.0, Some((10.0, 1.0)));
    }
}
