//! Simulated cart backend.
//!
//! A planar world for exercising the control loop without hardware:
//!
//! - **Light**: point sources. Each sensor sees an ambient floor plus, per
//!   source, `intensity × max(0, cos α) / (1 + (d / falloff)²)` where `α` is
//!   the angle between the sensor's pointing direction and the source and `d`
//!   is the cart–source distance.
//! - **Proximity**: a rectangular arena centred on the origin, measured by four
//!   beams in the order front (+y), right (+x), back (−y), left (−x).
//! - **Motion**: holonomic translation along the commanded bearing, clamped to
//!   the arena. The cart never rotates, so cart frame and world frame coincide.
//!
//! [`InstantDwell`] is a dwell timer that returns at once and records what was
//! asked of it.

use core::time::Duration;

use heapless::Vec as HVec;
use libm::{cosf, sinf, sqrtf};

use crate::dwell::{DwellTimer, StopFlag, WaitOutcome};
use crate::error::{CartError, Result, SensorKind};
use crate::geometry::SensorRing;
use crate::hardware::{Amplitudes, Clearances, LightSensor, MotionActuator, ProximitySensor};

/// Maximum number of light sources in one world.
pub const MAX_SOURCES: usize = 4;

/// Default distance scale of the light falloff (mm).
pub const DEFAULT_FALLOFF_MM: f32 = 100.0;

/// Default arena half-extent (mm).
pub const DEFAULT_ARENA_HALF_MM: f32 = 1000.0;

/// A point light source in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightSource {
    /// World x (mm).
    pub x: f32,
    /// World y (mm).
    pub y: f32,
    /// Peak amplitude seen by a sensor pointing straight at the source from zero distance.
    pub intensity: f32,
}

impl LightSource {
    /// Construct a source.
    pub const fn new(x: f32, y: f32, intensity: f32) -> Self {
        Self { x, y, intensity }
    }
}

/// Simulated cart in a walled arena lit by point sources.
#[derive(Clone, Debug)]
pub struct SimulatedCart {
    ring: SensorRing,
    sources: HVec<LightSource, MAX_SOURCES>,
    ambient: f32,
    falloff: f32,
    half_width: f32,
    half_height: f32,
    x: f32,
    y: f32,
    light_faults: u32,
    proximity_blind: bool,
}

impl SimulatedCart {
    /// A cart at the origin of a dark, empty 2 m × 2 m arena.
    pub fn new(ring: SensorRing) -> Self {
        Self {
            ring,
            sources: HVec::new(),
            ambient: 0.0,
            falloff: DEFAULT_FALLOFF_MM,
            half_width: DEFAULT_ARENA_HALF_MM,
            half_height: DEFAULT_ARENA_HALF_MM,
            x: 0.0,
            y: 0.0,
            light_faults: 0,
            proximity_blind: false,
        }
    }

    /// Add a light source. Fails once [`MAX_SOURCES`] are present.
    pub fn add_source(&mut self, source: LightSource) -> Result<()> {
        self.sources
            .push(source)
            .map_err(|_| CartError::invalid_config("too many simulated light sources"))
    }

    /// Place the cart, clamped into the arena.
    pub fn place(&mut self, x: f32, y: f32) {
        self.x = x.clamp(-self.half_width, self.half_width);
        self.y = y.clamp(-self.half_height, self.half_height);
    }

    /// Set the arena half-extents (mm) and re-clamp the cart.
    pub fn set_arena(&mut self, half_width: f32, half_height: f32) {
        self.half_width = half_width.max(0.0);
        self.half_height = half_height.max(0.0);
        self.place(self.x, self.y);
    }

    /// Set the ambient floor every sensor sees.
    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient.max(0.0);
    }

    /// Set the falloff distance scale (mm). Values below 1 mm are raised to 1 mm.
    pub fn set_falloff(&mut self, falloff: f32) {
        self.falloff = falloff.max(1.0);
    }

    /// Multiply every source's intensity by `factor` (clouds, dusk).
    pub fn scale_sources(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        for s in self.sources.iter_mut() {
            s.intensity *= factor;
        }
    }

    /// Make the next `count` light reads fail with a hardware error.
    pub fn inject_light_faults(&mut self, count: u32) {
        self.light_faults = count;
    }

    /// While `blind`, proximity reads return no beams.
    pub fn set_proximity_blind(&mut self, blind: bool) {
        self.proximity_blind = blind;
    }

    /// Current cart position (mm).
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Distance from the cart centre to `(x, y)`.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        sqrtf(dx * dx + dy * dy)
    }

    fn sample(&self) -> Amplitudes {
        let mut out = Amplitudes::new();
        for p in self.ring.positions() {
            let r = p.radius();
            let (ux, uy) = if r > 0.0 { (p.x / r, p.y / r) } else { (0.0, 0.0) };

            let mut amplitude = self.ambient;
            for s in self.sources.iter() {
                let dx = s.x - self.x;
                let dy = s.y - self.y;
                let d = sqrtf(dx * dx + dy * dy);
                // A source directly overhead lights every sensor fully.
                let facing = if d > 1e-3 {
                    ((ux * dx + uy * dy) / d).max(0.0)
                } else {
                    1.0
                };
                let q = d / self.falloff;
                amplitude += s.intensity * facing / (1.0 + q * q);
            }
            // Ring size is bounded by MAX_SENSORS, the capacity of Amplitudes.
            let _ = out.push(amplitude);
        }
        out
    }
}

impl LightSensor for SimulatedCart {
    fn get_samples(&mut self) -> Result<Amplitudes> {
        if self.light_faults > 0 {
            self.light_faults -= 1;
            return Err(CartError::hardware_read(SensorKind::Light, 0));
        }
        Ok(self.sample())
    }
}

impl ProximitySensor for SimulatedCart {
    fn measure(&mut self) -> Result<Clearances> {
        let mut out = Clearances::new();
        if self.proximity_blind {
            return Ok(out);
        }
        for d in [
            self.half_height - self.y,
            self.half_width - self.x,
            self.y + self.half_height,
            self.x + self.half_width,
        ] {
            let _ = out.push(d);
        }
        Ok(out)
    }
}

impl MotionActuator for SimulatedCart {
    fn make_a_move(&mut self, angle_degrees: f32, magnitude: f32) {
        let bearing = angle_degrees.to_radians();
        let x = self.x + magnitude * sinf(bearing);
        let y = self.y + magnitude * cosf(bearing);
        self.place(x, y);
    }
}

/// Dwell timer that never sleeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstantDwell {
    /// Number of dwells requested.
    pub dwells: u32,
    /// Sum of requested durations.
    pub requested: Duration,
}

impl DwellTimer for InstantDwell {
    fn dwell(&mut self, duration: Duration, stop: &StopFlag) -> WaitOutcome {
        self.dwells += 1;
        self.requested += duration;
        if stop.is_requested() {
            WaitOutcome::Interrupted
        } else {
            WaitOutcome::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    #[test]
    fn test_sensor_facing_source_is_brightest() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.add_source(LightSource::new(200.0, 0.0, 100.0)).unwrap();
        let amps = cart.get_samples().unwrap();
        // Sensor 2 sits at (30, 0), pointing at the source.
        let brightest = amps
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &a)| if a > best.1 { (i, a) } else { best });
        assert_eq!(brightest.0, 2);
        // The far side sees nothing without ambient light.
        assert!(amps[6].abs() < TOL);
    }

    #[test]
    fn test_ambient_floor() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.set_ambient(3.0);
        let amps = cart.get_samples().unwrap();
        assert!(amps.iter().all(|&a| (a - 3.0).abs() < TOL));
    }

    #[test]
    fn test_move_follows_compass_bearing() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.make_a_move(90.0, 10.0);
        let (x, y) = cart.position();
        assert!((x - 10.0).abs() < TOL && y.abs() < TOL);
        cart.make_a_move(180.0, 4.0);
        let (x, y) = cart.position();
        assert!((x - 10.0).abs() < TOL && (y + 4.0).abs() < TOL);
    }

    #[test]
    fn test_moves_are_clamped_to_arena() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.set_arena(50.0, 50.0);
        for _ in 0..20 {
            cart.make_a_move(0.0, 5.0);
        }
        assert_eq!(cart.position(), (0.0, 50.0));
    }

    #[test]
    fn test_clearances_front_right_back_left() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.set_arena(100.0, 200.0);
        cart.place(10.0, -20.0);
        let c = cart.measure().unwrap();
        assert_eq!(c.as_slice(), &[220.0, 90.0, 180.0, 110.0]);
    }

    #[test]
    fn test_fault_injection_and_blind_proximity() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.inject_light_faults(2);
        assert!(cart.get_samples().is_err());
        assert!(cart.get_samples().is_err());
        assert!(cart.get_samples().is_ok());

        cart.set_proximity_blind(true);
        assert!(cart.measure().unwrap().is_empty());
    }

    #[test]
    fn test_scaling_sources_dims_every_sensor() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        cart.add_source(LightSource::new(0.0, 100.0, 80.0)).unwrap();
        let before: f32 = cart.get_samples().unwrap().iter().sum();
        cart.scale_sources(0.5);
        let after: f32 = cart.get_samples().unwrap().iter().sum();
        assert!((after - before * 0.5).abs() < TOL);
    }

    #[test]
    fn test_source_capacity() {
        let mut cart = SimulatedCart::new(SensorRing::reference());
        for i in 0..MAX_SOURCES {
            cart.add_source(LightSource::new(i as f32, 0.0, 1.0)).unwrap();
        }
        assert!(cart.add_source(LightSource::new(0.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn test_instant_dwell_records_requests() {
        let mut t = InstantDwell::default();
        let stop = StopFlag::new();
        assert_eq!(t.dwell(Duration::from_secs(5), &stop), WaitOutcome::Completed);
        stop.request();
        assert_eq!(t.dwell(Duration::from_secs(5), &stop), WaitOutcome::Interrupted);
        assert_eq!(t.dwells, 2);
        assert_eq!(t.requested, Duration::from_secs(10));
    }
}
