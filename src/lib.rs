//! # phototaxis-core
//!
//! Light-seeking control for an autonomous cart: a ring of directional light
//! sensors steers the cart uphill in brightness until the light starts to fade,
//! then the cart parks and dwells at the optimum it found.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! LightSensor ─► SensorFrame ─► DirectionFinder ─► MotionPlanner ─┐
//!                                                                 ▼
//! ProximitySensor ─────────────────────────────► SafetyGate ─► MotionActuator
//!                                                                 │
//! LightSensor ─► total intensity ─► TrendTracker ─► ControlLoop ◄─┘
//!                                                     (SEEKING / DWELLING)
//! ```
//!
//! Each sensor contributes its position on the ring weighted by how much light
//! it sees. The weighted sum points at the light; the planner turns it into a
//! compass bearing; the gate refuses any move with an obstacle too close. After
//! every move the total intensity joins a short trailing window, and once the
//! newest total falls below the oldest the cart has passed a maximum and dwells.
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`geometry`] | [`SensorRing`], [`HeadingVector`] | Sensor layout in the cart frame |
//! | [`frame`] | [`SensorFrame`] | Validated pairing of amplitudes with positions |
//! | [`direction`] | [`DirectionFinder`] | Amplitude-weighted heading toward the light |
//! | [`trend`] | [`TrendTracker`] | Trailing intensity window and decline test |
//! | [`safety`] | [`SafetyGate`], [`GateDecision`] | Clearance check before every move |
//! | [`planner`] | [`MotionPlanner`], [`MoveCommand`] | Heading to compass-bearing move |
//! | [`control`] | [`ControlLoop`], [`ControlState`] | Seek/dwell supervisory loop |
//! | [`hardware`] | [`CartHardware`], [`Hardware`] | Light, proximity, and motion capabilities |
//! | [`dwell`] | [`StopFlag`], [`DwellTimer`] | Interruptible bounded wait |
//! | [`config`] | [`CartConfig`] | Startup parameter set |
//! | [`sim`] | [`SimulatedCart`], [`InstantDwell`] | Planar simulation backend |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default with no heap required; trigonometry
//! comes from `libm`. Enable the `std` feature for the thread-sleeping
//! [`dwell::ThreadDwell`] and `std` logging support. Enable the `serde` feature
//! to (de)serialise configuration and cycle reports. `python-ffi` builds the
//! pyo3 bindings.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//! Commercial production use requires a license from Flout Labs (cbyrne@floutlabs.com).

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod geometry;
pub mod frame;
pub mod direction;
pub mod trend;
pub mod safety;
pub mod planner;
pub mod hardware;
pub mod dwell;
pub mod config;
pub mod control;
pub mod sim;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use config::CartConfig;
pub use control::{ControlLoop, ControlState, CycleReport, LoopStats};
pub use direction::DirectionFinder;
pub use dwell::{DwellTimer, StopFlag, WaitOutcome};
pub use error::{CartError, Result, SensorKind};
pub use frame::{LightSample, SensorFrame};
pub use geometry::{HeadingVector, SensorPosition, SensorRing};
pub use hardware::{CartHardware, Hardware, LightSensor, MotionActuator, ProximitySensor};
pub use planner::{MotionPlanner, MoveCommand};
pub use safety::{GateDecision, SafetyGate};
pub use sim::{InstantDwell, LightSource, SimulatedCart};
pub use trend::TrendTracker;

#[cfg(feature = "std")]
pub use dwell::ThreadDwell;
