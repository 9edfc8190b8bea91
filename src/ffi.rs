//! Python FFI bindings via PyO3.
//!
//! Exposes the stateless pipeline stages and the trend window to Python, so a
//! cart driver written in Python can reuse the same direction, gate, and plateau
//! logic. The control loop itself stays in Rust.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from phototaxis_core import TrendTracker, reference_ring, find_direction, plan_move, clearance_ok
//!
//! positions = reference_ring()                 # [(x, y), ...] in mm
//! amplitudes = [10, 10, 30, 10, 10, 10, 10, 10]
//! x, y = find_direction(amplitudes, positions) # (~600.0, ~0.0)
//! angle, step = plan_move(x, y, 5.0)           # (90.0, 5.0)
//!
//! if clearance_ok([120.0, 80.0], 30.0):
//!     cart.make_a_move(angle, step)
//!
//! trend = TrendTracker(lag=3)
//! trend.record(sum(amplitudes))
//! print(trend.is_declining())
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::direction::DirectionFinder;
use crate::error::CartError;
use crate::frame::SensorFrame;
use crate::geometry::{HeadingVector, SensorPosition, SensorRing};
use crate::planner::MotionPlanner;
use crate::safety::SafetyGate;
use crate::trend::{TrendTracker as RustTrendTracker, DEFAULT_TREND_LAG};

fn to_py_err(e: CartError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn ring_from_pairs(positions: &[(f32, f32)]) -> PyResult<SensorRing> {
    let mut table = Vec::with_capacity(positions.len());
    for &(x, y) in positions {
        table.push(SensorPosition::new(x, y));
    }
    SensorRing::from_positions(&table).map_err(to_py_err)
}

// ── Stateless stages ──────────────────────────────────────────────────────────

/// Positions of the reference 8-sensor ring as `[(x, y), ...]` in mm.
#[pyfunction]
pub fn reference_ring() -> Vec<(f32, f32)> {
    SensorRing::reference()
        .positions()
        .iter()
        .map(|p| (p.x, p.y))
        .collect()
}

/// Amplitude-weighted heading toward the light.
///
/// Args:
///     amplitudes: one non-negative reading per sensor, in ring order
///     positions:  `[(x, y), ...]` sensor positions in mm, same order
///
/// Returns:
///     `(x, y)` heading in the cart frame; `(0.0, 0.0)` when the light is balanced
#[pyfunction]
pub fn find_direction(amplitudes: Vec<f32>, positions: Vec<(f32, f32)>) -> PyResult<(f32, f32)> {
    let ring = ring_from_pairs(&positions)?;
    let frame = SensorFrame::build(&ring, &amplitudes).map_err(to_py_err)?;
    let h = DirectionFinder::new().find(&frame);
    Ok((h.x, h.y))
}

/// Compass bearing (degrees, clockwise from forward) and step for a heading.
#[pyfunction]
#[pyo3(signature = (x, y, step=crate::planner::DEFAULT_STEP_MM))]
pub fn plan_move(x: f32, y: f32, step: f32) -> (f32, f32) {
    let cmd = MotionPlanner::new(step).plan(&HeadingVector::new(x, y));
    (cmd.angle_degrees, cmd.magnitude)
}

/// `True` iff there is at least one clearance and every one exceeds `min_clearance`.
#[pyfunction]
#[pyo3(signature = (clearances, min_clearance=crate::safety::DEFAULT_MIN_CLEARANCE_MM))]
pub fn clearance_ok(clearances: Vec<f32>, min_clearance: f32) -> bool {
    SafetyGate::new(min_clearance).allows(&clearances)
}

// ── TrendTracker ──────────────────────────────────────────────────────────────

/// Trailing window of total intensities.
///
/// `is_declining()` turns true once the window is full and its newest value
/// is strictly below its oldest.
#[pyclass(name = "TrendTracker")]
pub struct PyTrendTracker {
    inner: RustTrendTracker,
}

#[pymethods]
impl PyTrendTracker {
    /// Create a tracker with window length `lag` (1 to 32).
    #[new]
    #[pyo3(signature = (lag=DEFAULT_TREND_LAG))]
    pub fn new(lag: usize) -> PyResult<Self> {
        Ok(Self {
            inner: RustTrendTracker::new(lag).map_err(to_py_err)?,
        })
    }

    /// Append a total-intensity reading.
    pub fn record(&mut self, total_intensity: f32) {
        self.inner.record(total_intensity);
    }

    /// Whether the light has fallen across the full window.
    pub fn is_declining(&self) -> bool {
        self.inner.is_declining()
    }

    /// Empty the window.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Window contents, oldest first.
    pub fn window(&self) -> Vec<f32> {
        self.inner.window().collect()
    }

    /// Highest reading since the last reset, or `None`.
    #[getter]
    pub fn peak(&self) -> Option<f32> {
        self.inner.peak()
    }

    /// Configured window length.
    #[getter]
    pub fn lag(&self) -> usize {
        self.inner.lag()
    }

    /// Number of readings currently held.
    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("TrendTracker(lag={}, len={})", self.inner.lag(), self.inner.len())
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Light-seeking cart primitives.
#[pymodule]
pub fn phototaxis_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(reference_ring, m)?)?;
    m.add_function(wrap_pyfunction!(find_direction, m)?)?;
    m.add_function(wrap_pyfunction!(plan_move, m)?)?;
    m.add_function(wrap_pyfunction!(clearance_ok, m)?)?;
    m.add_class::<PyTrendTracker>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
