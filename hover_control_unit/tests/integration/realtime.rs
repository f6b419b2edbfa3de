//! Control loop against the free-running threaded simulation.

use std::time::{Duration, Instant};

use hover_common::control::AltitudeHoldConfig;
use hover_common::sim::{STATE_Z, Simulation};
use hover_control_unit::control::altitude::AltitudeController;
use hover_control_unit::cycle::{ControlLoop, SleepYield, ThreadYield};
use hover_sim::{SimConfig, ThreadedSimulation, VehicleParams};

fn controller() -> AltitudeController {
    AltitudeController::new(AltitudeHoldConfig::default()).unwrap()
}

fn started_sim(duration_s: f64) -> ThreadedSimulation {
    let config = SimConfig {
        step_us: 1000,
        duration_s,
    };
    let mut sim = ThreadedSimulation::new(VehicleParams::default(), config).unwrap();
    sim.start().unwrap();
    sim
}

#[test]
fn loop_exits_when_threaded_sim_finishes() {
    let sim = started_sim(0.2);
    let mut cl = ControlLoop::new(sim, controller(), SleepYield::new(Duration::from_micros(200)));

    let begin = Instant::now();
    let stats = cl.run();
    assert!(begin.elapsed() < Duration::from_secs(30));

    assert!(stats.cycles > 0);
    assert!(stats.updates > 0);
    assert!((0.0..=1.0).contains(&stats.last_command));
    assert!(stats.last_time <= 0.2 + 1e-9);

    let altitude = -cl.sim_mut().vehicle_state()[STATE_Z];
    assert!(altitude > 0.0, "vehicle never left the ground");
}

#[test]
fn stop_handle_ends_loop_from_another_thread() {
    let sim = started_sim(3600.0);
    let stop = sim.stop_handle();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        stop.request_stop();
    });

    let mut cl = ControlLoop::new(sim, controller(), ThreadYield);
    let stats = cl.run();
    stopper.join().unwrap();

    assert!(stats.cycles > 0);
    assert!(stats.last_time < 3600.0);
}
