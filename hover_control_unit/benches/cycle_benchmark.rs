//! Control cycle micro-benchmark.
//!
//! Measures:
//! - `AltitudeController::update` alone
//! - clamp + broadcast
//! - one full `ControlLoop::step` against the lock-step simulation

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use hover_common::control::AltitudeHoldConfig;
use hover_common::sim::Simulation;
use hover_control_unit::control::altitude::AltitudeController;
use hover_control_unit::control::output::{broadcast, clamp_command};
use hover_control_unit::cycle::{ControlLoop, NoYield};
use hover_sim::{LockstepSimulation, SimConfig, VehicleParams};

const DT: f64 = 0.001;

fn reference_config() -> AltitudeHoldConfig {
    AltitudeHoldConfig {
        target_altitude: 10.0,
        altitude_gain: 1.0,
        velocity_gain: 1.0,
        velocity_integral_gain: 0.05,
    }
}

fn bench_update(c: &mut Criterion) {
    let mut controller = AltitudeController::new(reference_config()).unwrap();
    let mut cycle = 0u64;

    c.bench_function("altitude_update", |b| {
        b.iter(|| {
            cycle += 1;
            let altitude = (cycle % 1000) as f64 * 0.01;
            black_box(controller.update(black_box(altitude), black_box(0.2), DT))
        })
    });
}

fn bench_output(c: &mut Criterion) {
    c.bench_function("clamp_broadcast", |b| {
        b.iter(|| black_box(broadcast(clamp_command(black_box(1.7)))))
    });
}

fn bench_loop_step(c: &mut Criterion) {
    let sim_config = SimConfig {
        step_us: 1000,
        duration_s: 1.0e9,
    };
    let mut sim = LockstepSimulation::new(VehicleParams::default(), sim_config).unwrap();
    sim.start().unwrap();
    let controller = AltitudeController::new(reference_config()).unwrap();
    let mut control_loop = ControlLoop::new(sim, controller, NoYield);

    c.bench_function("control_loop_step", |b| {
        b.iter(|| black_box(control_loop.step()))
    });
}

criterion_group!(benches, bench_update, bench_output, bench_loop_step);
criterion_main!(benches);
