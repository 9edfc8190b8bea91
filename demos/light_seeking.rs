//! # Light-seeking simulation
//!
//! A cart starts in the middle of a 2 m arena with a lamp 300 mm away. It
//! climbs the light gradient, settles on the lamp, and dwells once the lamp
//! starts to fade. A second run puts the cart against a wall to show the
//! safety gate refusing every move.
//!
//! ```bash
//! cargo run --example light_seeking --features std
//! ```

use std::time::Duration;

use phototaxis_core::sim::{InstantDwell, LightSource, SimulatedCart};
use phototaxis_core::{
    CartConfig, ControlLoop, CycleReport, GateDecision, SensorRing, StopFlag, WaitOutcome,
};

const LAMP: (f32, f32) = (180.0, 240.0);

fn describe(report: &CycleReport, cart: &SimulatedCart) -> String {
    let (x, y) = cart.position();
    let action = match (&report.gate, &report.command) {
        (_, Some(cmd)) => format!("move {:>7.1}° × {} mm", cmd.angle_degrees, cmd.magnitude),
        (GateDecision::Blocked { nearest }, None) => format!("blocked ({nearest:.0} mm)"),
        _ => "no move".to_string(),
    };
    let dwell = match report.dwell {
        Some(WaitOutcome::Completed) => "  ⏸ dwell",
        Some(WaitOutcome::Interrupted) => "  ⏹ dwell interrupted",
        None => "",
    };
    format!(
        "  cycle {:>3}  pos ({:>6.1}, {:>6.1})  lamp {:>6.1} mm  total {:>7.2}  {}{}",
        report.cycle,
        x,
        y,
        cart.distance_to(LAMP.0, LAMP.1),
        report.total_intensity,
        action,
        dwell
    )
}

fn seek() {
    println!("── Seeking a lamp at ({}, {}) ──", LAMP.0, LAMP.1);

    let mut cart = SimulatedCart::new(SensorRing::reference());
    cart.set_ambient(0.5);
    if let Err(e) = cart.add_source(LightSource::new(LAMP.0, LAMP.1, 100.0)) {
        println!("  cannot place lamp: {e}");
        return;
    }

    let config = CartConfig {
        dwell_duration: Duration::from_secs(15 * 60),
        ..CartConfig::default()
    };
    let mut cl = match ControlLoop::new(config, cart, InstantDwell::default()) {
        Ok(cl) => cl,
        Err(e) => {
            println!("  bad configuration: {e}");
            return;
        }
    };
    let stop = StopFlag::new();

    for _ in 0..80 {
        match cl.step(&stop) {
            Ok(report) if report.cycle % 10 == 0 || report.dwell.is_some() => {
                println!("{}", describe(&report, cl.hardware()));
            }
            Ok(_) => {}
            Err(e) => println!("  cycle aborted: {e}"),
        }
    }

    println!("── Dusk: the lamp fades 30% per cycle ──");
    for _ in 0..6 {
        cl.hardware_mut().scale_sources(0.7);
        match cl.step(&stop) {
            Ok(report) => println!("{}", describe(&report, cl.hardware())),
            Err(e) => println!("  cycle aborted: {e}"),
        }
    }

    let stats = cl.stats();
    println!(
        "  {} cycles, {} moves, {} dwells ({:?} of requested dwell), peak total {:.2}",
        stats.cycles,
        stats.moves,
        stats.dwells,
        cl.timer().requested,
        stats.peak_intensity.unwrap_or(0.0)
    );
}

fn cornered() {
    println!("── Against the north wall ──");

    let mut cart = SimulatedCart::new(SensorRing::reference());
    if cart.add_source(LightSource::new(0.0, 1500.0, 100.0)).is_err() {
        return;
    }
    cart.place(0.0, 985.0);

    let Ok(mut cl) = ControlLoop::new(CartConfig::default(), cart, InstantDwell::default()) else {
        return;
    };
    match cl.run_cycles(&StopFlag::new(), 5) {
        Ok(stats) => println!(
            "  {} cycles, {} blocked, {} moves; cart still at {:?}",
            stats.cycles,
            stats.blocked,
            stats.moves,
            cl.hardware().position()
        ),
        Err(e) => println!("  run failed: {e}"),
    }
}

fn main() {
    seek();
    println!();
    cornered();
}
