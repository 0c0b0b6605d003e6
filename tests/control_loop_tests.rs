mod common;

use approx::assert_abs_diff_eq;
use common::{RecordingObserver, RecordingRenderer, ScriptedClock};
use hapticsim::{
    Axis, ControlLoop, DeviceStatus, HandleMapping, HapticDevice, HapticError, Indicators,
    LoopConfig, LoopState, NoOpObserver, NullRenderer, Orientation, SimulatedDevice, StopFlag,
};
use mockall::mock;
use std::sync::{Arc, Mutex};

mock! {
    pub Device {}
    impl HapticDevice for Device {
        fn load_firmware(&mut self, path: &str) -> DeviceStatus;
        fn poll_io(&mut self) -> DeviceStatus;
        fn position(&self) -> [f64; 3];
        fn set_force(&mut self, force: [f64; 3]);
        fn set_indicators(&mut self, indicators: Indicators);
        fn close(&mut self);
    }
}

/// Device z that the default mapping turns into handle position `sim`.
fn device_z(sim: f64) -> f64 {
    0.125 + sim * 0.05
}

fn quiet_device(z: f64) -> MockDevice {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_poll_io().return_const(DeviceStatus::OK);
    dev.expect_position().return_const([0.0, 0.0, z]);
    dev.expect_set_force().return_const(());
    dev.expect_set_indicators().return_const(());
    dev.expect_close().return_const(());
    dev
}

#[test]
fn invalid_config_fails_before_touching_device() {
    // No expectations: any device call would panic.
    let dev = MockDevice::new();
    let clock = ScriptedClock::fixed(0.0);
    let result = ControlLoop::new(LoopConfig::new().with_target_rate(0), dev, NullRenderer, &clock);
    assert!(matches!(result, Err(HapticError::InvalidRate)));
}

#[test]
fn invalid_cursor_mass_is_rejected() {
    let clock = ScriptedClock::fixed(0.0);
    let config = LoopConfig::new().with_cursor_mass(-1.0);
    let result = ControlLoop::new(config, MockDevice::new(), NullRenderer, &clock);
    assert!(matches!(result, Err(HapticError::InvalidMass)));
}

#[test]
fn firmware_failure_is_not_fatal() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware()
        .withf(|path| path.to_string() == "fw.bin")
        .times(1)
        .return_const(DeviceStatus(-3));
    dev.expect_set_indicators().return_const(());
    let clock = ScriptedClock::fixed(0.0);
    let config = LoopConfig::new().with_firmware(Some("fw.bin".to_string()));
    let control = ControlLoop::new(config, dev, NullRenderer, &clock).unwrap();
    assert_eq!(control.state(), LoopState::Running);
}

#[test]
fn skipping_firmware_never_loads() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().never();
    dev.expect_set_indicators().return_const(());
    let clock = ScriptedClock::fixed(0.0);
    let config = LoopConfig::new().with_firmware(None);
    assert!(ControlLoop::new(config, dev, NullRenderer, &clock).is_ok());
}

#[test]
fn bad_poll_status_is_reported_and_loop_continues() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    let mut polls = 0;
    dev.expect_poll_io().returning(move || {
        polls += 1;
        if polls == 2 { DeviceStatus(5) } else { DeviceStatus::OK }
    });
    dev.expect_position().return_const([0.0, 0.0, device_z(-1.0)]);
    dev.expect_set_force().return_const(());
    dev.expect_set_indicators().return_const(());

    let clock = ScriptedClock::stepping(0.0, 0.5);
    let config = LoopConfig::new().with_max_iterations(5);
    let mut control = ControlLoop::new(config, dev, RecordingRenderer::default(), &clock).unwrap();
    let mut observer = RecordingObserver::default();
    let summary = control.run(&StopFlag::new(), &mut observer);

    assert_eq!(summary.iterations, 5);
    assert_eq!(summary.fault_polls, 1);
    assert_eq!(observer.statuses, vec![DeviceStatus(5)]);
    assert_eq!(observer.reports[1].status, DeviceStatus(5));
    assert_eq!(control.state(), LoopState::Stopped);

    let frame = &control.renderer().frames[1];
    assert!(frame.iter().any(|line| line.contains("status 5")));
}

#[test]
fn fault_lights_red_indicator() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_poll_io().return_const(DeviceStatus(1));
    dev.expect_position().return_const([0.0, 0.0, device_z(-1.0)]);
    dev.expect_set_force().return_const(());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    dev.expect_set_indicators()
        .returning(move |ind| sink.lock().unwrap().push(ind));

    let clock = ScriptedClock::stepping(0.0, 1.0);
    let mut control = ControlLoop::new(LoopConfig::new(), dev, NullRenderer, &clock).unwrap();
    control.iterate(&mut NoOpObserver);
    control.iterate(&mut NoOpObserver);

    let seen = seen.lock().unwrap();
    // Green at start, red on the first fault, no repeat for the second.
    assert_eq!(seen.len(), 2);
    assert!(seen[0].green && !seen[0].red);
    assert!(seen[1].red && !seen[1].green);
}

#[test]
fn force_command_follows_handle_reaction() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_poll_io().return_const(DeviceStatus::OK);
    dev.expect_position().return_const([0.0, 0.0, device_z(-0.5)]);
    dev.expect_set_indicators().return_const(());
    let forces = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&forces);
    dev.expect_set_force()
        .returning(move |f| sink.lock().unwrap().push(f));

    let clock = ScriptedClock::stepping(0.0, 1.0);
    let mut control = ControlLoop::new(LoopConfig::new(), dev, NullRenderer, &clock).unwrap();
    let report = control.iterate(&mut NoOpObserver);

    assert_abs_diff_eq!(report.handle_position, -0.5, epsilon = 1e-9);
    // Handle 0.5 below a cursor at rest: |k| * (d + 0.5) = 5 * 0.6
    assert_abs_diff_eq!(report.handle_force, 3.0, epsilon = 1e-9);
    assert_eq!(control.handle().queued_force, 0.0);
    assert_eq!(control.cursor().queued_force, 0.0);

    let forces = forces.lock().unwrap();
    assert_eq!(forces.len(), 1);
    assert_eq!(forces[0][0], 0.0);
    assert_eq!(forces[0][1], 0.0);
    assert_abs_diff_eq!(forces[0][2], 3.0, epsilon = 1e-9);
}

#[test]
fn mirrored_handle_reverses_force_command() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_poll_io().return_const(DeviceStatus::OK);
    // Mirrored: device below centre reads as handle +0.5, above the cursor.
    dev.expect_position().return_const([0.0, 0.0, device_z(-0.5)]);
    dev.expect_set_indicators().return_const(());
    let forces = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&forces);
    dev.expect_set_force()
        .returning(move |f| sink.lock().unwrap().push(f));

    let clock = ScriptedClock::stepping(0.0, 1.0);
    let config = LoopConfig::new().mirrored();
    let mut control = ControlLoop::new(config, dev, NullRenderer, &clock).unwrap();
    let report = control.iterate(&mut NoOpObserver);

    assert_abs_diff_eq!(report.handle_position, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(report.handle_force, -3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(forces.lock().unwrap()[0][2], 3.0, epsilon = 1e-9);
}

#[test]
fn stop_before_run_does_nothing() {
    // No poll expectation: iterating would panic.
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_set_indicators().return_const(());
    let clock = ScriptedClock::fixed(0.0);
    let mut control = ControlLoop::new(LoopConfig::new(), dev, NullRenderer, &clock).unwrap();
    let stop = StopFlag::new();
    stop.request();
    let summary = control.run(&stop, &mut NoOpObserver);
    assert_eq!(summary.iterations, 0);
    assert_eq!(control.state(), LoopState::Stopped);
}

#[test]
fn stop_mid_run_finishes_current_iteration() {
    let clock = ScriptedClock::stepping(0.0, 0.5);
    let mut control =
        ControlLoop::new(LoopConfig::new(), quiet_device(device_z(-1.0)), NullRenderer, &clock)
            .unwrap();
    let stop = StopFlag::new();
    let mut observer = RecordingObserver {
        stop_after: Some((2, stop.clone())),
        ..Default::default()
    };
    let summary = control.run(&stop, &mut observer);

    assert_eq!(summary.iterations, 3);
    assert_eq!(observer.reports.len(), 3);
    assert_eq!(observer.laws_applied, 3);
    assert_eq!(observer.integrations, 3);
}

#[test]
fn stopped_loop_does_not_restart() {
    let clock = ScriptedClock::stepping(0.0, 0.5);
    let config = LoopConfig::new().with_max_iterations(2);
    let mut control =
        ControlLoop::new(config, quiet_device(device_z(-1.0)), NullRenderer, &clock).unwrap();
    let first = control.run(&StopFlag::new(), &mut NoOpObserver);
    let second = control.run(&StopFlag::new(), &mut NoOpObserver);
    assert_eq!(first.iterations, 2);
    assert_eq!(second, first);
}

#[test]
fn shutdown_zeroes_force_and_closes() {
    let mut dev = MockDevice::new();
    dev.expect_load_firmware().return_const(DeviceStatus::OK);
    dev.expect_set_force()
        .withf(|f| *f == [0.0; 3])
        .times(1)
        .return_const(());
    dev.expect_set_indicators().return_const(());
    dev.expect_close().times(1).return_const(());

    let clock = ScriptedClock::fixed(0.0);
    let control = ControlLoop::new(LoopConfig::new(), dev, NullRenderer, &clock).unwrap();
    let mut dev = control.shutdown();
    dev.checkpoint();
}

#[test]
fn overlay_shows_rate_every_frame() {
    let clock = ScriptedClock::stepping(0.0, 0.5);
    let config = LoopConfig::new().with_max_iterations(3);
    let mut control =
        ControlLoop::new(config, quiet_device(device_z(0.0)), RecordingRenderer::default(), &clock)
            .unwrap();
    control.run(&StopFlag::new(), &mut NoOpObserver);
    let frames = &control.renderer().frames;
    assert_eq!(frames.len(), 3);
    for frame in frames {
        assert!(frame[0].ends_with("FPS"));
        assert!(frame[1].starts_with("handle"));
    }
}

#[test]
fn simulated_device_session_stays_bounded() {
    let config = LoopConfig::new().with_max_iterations(6400);
    let mapping = config.mapping;
    let device = SimulatedDevice::open(0, mapping.axis, mapping.lower, mapping.upper).unwrap();
    let clock = ScriptedClock::stepping(0.0, 0.25);
    let mut control = ControlLoop::new(config, device, NullRenderer, &clock).unwrap();
    let summary = control.run(&StopFlag::new(), &mut NoOpObserver);

    assert_eq!(summary.iterations, 6400);
    assert!(control.cursor().position.is_finite());
    assert!(control.cursor().position.abs() < 5.0);
    assert!(summary.observed_rate > 0);

    let device = control.shutdown();
    assert!(device.firmware_loaded());
    assert!(!device.is_open());
    assert_eq!(device.polls(), 6400);
}

#[test]
fn mapping_round_trip_on_other_axis() {
    let mapping = HandleMapping {
        axis: Axis::X,
        lower: -0.05,
        upper: 0.05,
        orientation: Orientation::Below,
    };
    assert_abs_diff_eq!(mapping.to_sim([0.05, 9.0, 9.0]), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(mapping.to_sim([-0.025, 0.0, 0.0]), -0.5, epsilon = 1e-12);
    assert_eq!(mapping.to_device(2.0), [2.0, 0.0, 0.0]);
    assert!(HandleMapping { lower: 1.0, upper: 1.0, ..mapping }.validate().is_err());
}
