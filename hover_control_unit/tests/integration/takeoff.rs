//! Closed-loop take-off against the lock-step vertical simulation.
//!
//! With Ki = 0 the cascade settles where the proportional thrust equals the
//! hover command: `altitude = target - hover / (Kp_alt * Kp_vel)`.

use hover_common::control::AltitudeHoldConfig;
use hover_common::sim::{MOTOR_COUNT, STATE_DZ, STATE_Z, Simulation};
use hover_control_unit::control::altitude::AltitudeController;
use hover_control_unit::cycle::{Cycle, ControlLoop, NoYield};
use hover_sim::{LockstepSimulation, SimConfig, VehicleParams};

const TARGET: f64 = 10.0;

fn takeoff_loop(duration_s: f64, ki: f64) -> ControlLoop<LockstepSimulation, NoYield> {
    let sim_config = SimConfig {
        step_us: 1000,
        duration_s,
    };
    let mut sim = LockstepSimulation::new(VehicleParams::default(), sim_config).unwrap();
    sim.start().unwrap();

    let controller = AltitudeController::new(AltitudeHoldConfig {
        target_altitude: TARGET,
        altitude_gain: 1.0,
        velocity_gain: 1.0,
        velocity_integral_gain: ki,
    })
    .unwrap();

    ControlLoop::new(sim, controller, NoYield)
}

#[test]
fn proportional_takeoff_settles_below_target() {
    let mut cl = takeoff_loop(20.0, 0.0);
    let stats = cl.run();

    // First sample at t = 0 has no interval; every later one updates.
    assert_eq!(stats.held, 1);
    assert_eq!(stats.cycles, cl.sim().steps());
    assert_eq!(stats.updates + stats.held, stats.cycles);
    assert!(stats.saturated > 0, "take-off should start saturated");

    let state = cl.sim_mut().vehicle_state();
    let altitude = -state[STATE_Z];
    let climb_rate = -state[STATE_DZ];
    let expected = TARGET - VehicleParams::default().hover_command();

    assert!(
        (altitude - expected).abs() < 0.05,
        "altitude {altitude}, expected ≈ {expected}"
    );
    assert!(climb_rate.abs() < 0.05, "climb rate {climb_rate}");
    assert!(stats.last_command > 0.0 && stats.last_command < 1.0);
}

#[test]
fn integral_keeps_growing_with_zero_ki() {
    // Steady-state error never closes with Ki = 0, so the (unused)
    // integrator grows without bound.
    let mut short = takeoff_loop(10.0, 0.0);
    short.run();
    let mut long = takeoff_loop(20.0, 0.0);
    long.run();

    let a = short.controller().integrated_velocity_error();
    let b = long.controller().integrated_velocity_error();
    assert!(a > 0.0);
    assert!(b > a + 1.0, "integral {a} -> {b}");
}

#[test]
fn first_cycle_sends_zero_to_all_motors() {
    let mut cl = takeoff_loop(1.0, 0.0);
    let first = cl.step();
    assert!(matches!(first, Cycle::Held { command, .. } if command == 0.0));
    assert_eq!(cl.sim().last_motors(), &[0.0; MOTOR_COUNT]);

    let second = cl.step();
    assert!(matches!(second, Cycle::Updated { command, .. } if command == 1.0));
    assert_eq!(cl.sim().last_motors(), &[1.0; MOTOR_COUNT]);
}

#[test]
fn stop_request_ends_run_early() {
    let mut cl = takeoff_loop(1000.0, 0.0);
    for _ in 0..10 {
        cl.step();
    }
    cl.sim().stop_handle().request_stop();
    let stats = cl.run();
    assert_eq!(stats.cycles, 10);
    assert_eq!(cl.sim().steps(), 10);
}
