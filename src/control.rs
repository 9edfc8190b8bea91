/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Hill-climbing supervisory loop.
//!
//! One cycle, always in this order:
//!
//! ```text
//! read light ─► frame ─► heading
//! read clearances ─► gate ─┬─ clear ───► plan ─► make_a_move
//!                          └─ blocked ─► (no move)
//! re-read light ─► total ─► trend.record
//! SEEKING && trend.is_declining() ─► DWELLING ─► dwell ─► SEEKING, trend.reset()
//! ```
//!
//! # Invariants
//!
//! - No move is issued unless this cycle's own clearance read passed the gate.
//! - A failed or empty read aborts the rest of the cycle; the next cycle retries.
//! - Configuration errors end the run; they are never retried.
//! - The dwell is bounded by `dwell_duration` and ends early on a stop request.
//! - Trend state lives in this loop's own [`TrendTracker`]; nothing is global.

use log::{debug, error, info, warn};

use crate::config::CartConfig;
use crate::direction::DirectionFinder;
use crate::dwell::{DwellTimer, StopFlag, WaitOutcome};
use crate::error::{CartError, Result, SensorKind};
use crate::frame::SensorFrame;
use crate::geometry::HeadingVector;
use crate::hardware::CartHardware;
use crate::planner::{MotionPlanner, MoveCommand};
use crate::safety::{GateDecision, SafetyGate};
use crate::trend::TrendTracker;

// ─── ControlState ───────────────────────────────────────────────────────────

/// Supervisory state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlState {
    /// Climbing toward more light.
    #[default]
    Seeking,
    /// Pausing at a discovered optimum. Only held for the duration of the dwell.
    Dwelling,
}

// ─── Reports ────────────────────────────────────────────────────────────────

/// What one completed cycle did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Heading estimated from the first light read.
    pub heading: HeadingVector,
    /// Verdict of the safety gate.
    pub gate: GateDecision,
    /// The move dispatched, if the gate allowed one.
    pub command: Option<MoveCommand>,
    /// Total intensity of the post-move light read.
    pub total_intensity: f32,
    /// How the dwell ended, if this cycle detected a plateau.
    pub dwell: Option<WaitOutcome>,
    /// State at the end of the cycle.
    pub state: ControlState,
}

/// Running counters over the lifetime of a [`ControlLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopStats {
    /// Cycles started.
    pub cycles: u64,
    /// Moves dispatched.
    pub moves: u64,
    /// Cycles where the gate refused the move.
    pub blocked: u64,
    /// Cycles cut short by a recoverable read error.
    pub aborted: u64,
    /// Dwells entered.
    pub dwells: u64,
    /// Dwells cut short by a stop request.
    pub interrupted_dwells: u64,
    /// Highest post-move total intensity seen.
    pub peak_intensity: Option<f32>,
}

impl LoopStats {
    fn observe_intensity(&mut self, total: f32) {
        match self.peak_intensity {
            Some(p) if p >= total => {}
            _ => self.peak_intensity = Some(total),
        }
    }
}

// ─── ControlLoop ────────────────────────────────────────────────────────────

/// The light-seeking state machine, generic over its hardware backend and dwell timer.
pub struct ControlLoop<H, T> {
    config: CartConfig,
    finder: DirectionFinder,
    planner: MotionPlanner,
    gate: SafetyGate,
    trend: TrendTracker,
    state: ControlState,
    stats: LoopStats,
    hardware: H,
    timer: T,
}

impl<H: CartHardware, T: DwellTimer> ControlLoop<H, T> {
    /// Validate `config` and assemble the loop.
    ///
    /// Configuration errors surface here, before any hardware is touched.
    pub fn new(config: CartConfig, hardware: H, timer: T) -> Result<Self> {
        if let Err(e) = config.validate() {
            error!("rejecting cart configuration: {}", e);
            return Err(e);
        }
        let trend = TrendTracker::new(config.trend_lag)?;
        Ok(Self {
            finder: DirectionFinder::new(),
            planner: MotionPlanner::new(config.step_magnitude),
            gate: SafetyGate::new(config.min_clearance),
            trend,
            state: ControlState::Seeking,
            stats: LoopStats::default(),
            hardware,
            timer,
            config,
        })
    }

    /// Run one full cycle.
    ///
    /// Read errors abort the cycle and are returned; the caller decides whether
    /// to retry (see [`CartError::is_recoverable`]).
    pub fn step(&mut self, stop: &StopFlag) -> Result<CycleReport> {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        let result = self.run_cycle(cycle, stop);
        if let Err(e) = &result {
            if e.is_recoverable() {
                self.stats.aborted += 1;
                warn!("cycle {} aborted: {}", cycle, e);
            } else {
                error!("cycle {} failed: {}", cycle, e);
            }
        }
        result
    }

    /// Cycle until `stop` is raised.
    ///
    /// Recoverable errors are retried on the next cycle. Returns the lifetime
    /// stats, or the first configuration error.
    pub fn run(&mut self, stop: &StopFlag) -> Result<LoopStats> {
        self.run_bounded(stop, None)
    }

    /// Like [`run`](Self::run), but stops after at most `max_cycles` cycles.
    pub fn run_cycles(&mut self, stop: &StopFlag, max_cycles: u64) -> Result<LoopStats> {
        self.run_bounded(stop, Some(max_cycles))
    }

    fn run_bounded(&mut self, stop: &StopFlag, max_cycles: Option<u64>) -> Result<LoopStats> {
        info!(
            "light seeking started: {} sensors, step {} mm, clearance {} mm, lag {}",
            self.config.sensor_count,
            self.config.step_magnitude,
            self.config.min_clearance,
            self.config.trend_lag
        );
        let mut ran = 0u64;
        loop {
            if stop.is_requested() {
                info!("stop requested after {} cycles", ran);
                break;
            }
            if max_cycles.is_some_and(|max| ran >= max) {
                break;
            }
            ran += 1;
            match self.step(stop) {
                Ok(report) => {
                    if report.dwell == Some(WaitOutcome::Interrupted) {
                        info!("dwell interrupted, stopping");
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(self.stats)
    }

    fn run_cycle(&mut self, cycle: u64, stop: &StopFlag) -> Result<CycleReport> {
        let frame = self.read_frame()?;
        let heading = self.finder.find(&frame);

        let clearances = self.hardware.measure()?;
        let gate = self.gate.evaluate(&clearances);
        let command = match gate {
            GateDecision::Clear => {
                let cmd = self.planner.plan(&heading);
                debug!(
                    "cycle {}: heading ({:.1}, {:.1}) → move {:.1}° × {} mm",
                    cycle, heading.x, heading.y, cmd.angle_degrees, cmd.magnitude
                );
                self.hardware.make_a_move(cmd.angle_degrees, cmd.magnitude);
                self.stats.moves += 1;
                Some(cmd)
            }
            GateDecision::Blocked { nearest } => {
                warn!(
                    "cycle {}: move skipped, clearance {:.1} mm within {:.1} mm",
                    cycle, nearest, self.gate.min_clearance
                );
                self.stats.blocked += 1;
                None
            }
            GateDecision::Unavailable => {
                return Err(CartError::sensor_unavailable(SensorKind::Proximity));
            }
        };

        let total_intensity = self.read_frame()?.total_intensity();
        self.trend.record(total_intensity);
        self.stats.observe_intensity(total_intensity);
        debug!("cycle {}: total intensity {:.2}", cycle, total_intensity);

        let dwell = if self.state == ControlState::Seeking && self.trend.is_declining() {
            Some(self.dwell(cycle, stop))
        } else {
            None
        };

        Ok(CycleReport {
            cycle,
            heading,
            gate,
            command,
            total_intensity,
            dwell,
            state: self.state,
        })
    }

    fn read_frame(&mut self) -> Result<SensorFrame> {
        let amplitudes = self.hardware.get_samples()?;
        SensorFrame::build(&self.config.sensor_positions, &amplitudes)
    }

    fn dwell(&mut self, cycle: u64, stop: &StopFlag) -> WaitOutcome {
        info!(
            "cycle {}: intensity past its peak ({:?} → {:?}), dwelling for {:?}",
            cycle,
            self.trend.oldest(),
            self.trend.newest(),
            self.config.dwell_duration
        );
        self.state = ControlState::Dwelling;
        self.stats.dwells += 1;

        let outcome = self.timer.dwell(self.config.dwell_duration, stop);
        if outcome == WaitOutcome::Interrupted {
            self.stats.interrupted_dwells += 1;
        }

        self.state = ControlState::Seeking;
        self.trend.reset();
        info!("cycle {}: dwell {:?}, seeking again", cycle, outcome);
        outcome
    }
}

impl<H, T> ControlLoop<H, T> {
    /// Current supervisory state.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Configuration in force.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The loop's intensity window.
    pub fn trend(&self) -> &TrendTracker {
        &self.trend
    }

    /// Lifetime counters.
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// The hardware backend.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// The hardware backend, mutably.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// The dwell timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Tear the loop down into its backend and timer.
    pub fn into_parts(self) -> (H, T) {
        (self.hardware, self.timer)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
