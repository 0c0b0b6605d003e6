//! The real-time control loop: device in, simulation, force out, pace.

use crate::cancel::StopFlag;
use crate::config::LoopConfig;
use crate::contact::{ContactPair, Orientation};
use crate::device::{Axis, DeviceStatus, HapticDevice, Indicators};
use crate::error::HapticError;
use crate::law::{self, Damping, ForceLaw};
use crate::observer::LoopObserver;
use crate::pacer::{Clock, FramePacer};
use crate::point_mass::PointMass;
use crate::render::Renderer;
use crate::scene::Scene;
use alloc::format;

/// Maps one device axis onto the handle's simulation coordinate.
///
/// The physical range `[lower, upper]` becomes `[-1, 1]`; an `Above`
/// orientation mirrors both position and the returned force.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandleMapping {
    pub axis: Axis,
    pub lower: f64,
    pub upper: f64,
    pub orientation: Orientation,
}

impl Default for HandleMapping {
    fn default() -> Self {
        HandleMapping {
            axis: Axis::Z,
            lower: 0.075,
            upper: 0.175,
            orientation: Orientation::Below,
        }
    }
}

impl HandleMapping {
    pub fn validate(&self) -> Result<(), HapticError> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower >= self.upper {
            return Err(HapticError::InvalidRange);
        }
        Ok(())
    }

    /// Device position to simulation units.
    pub fn to_sim(&self, position: [f64; 3]) -> f64 {
        let centre = (self.lower + self.upper) / 2.0;
        let half_range = (self.upper - self.lower) / 2.0;
        (position[self.axis.index()] - centre) / half_range * self.orientation.sign::<f64>()
    }

    /// Handle reaction force to a device force command.
    pub fn to_device(&self, force: f64) -> [f64; 3] {
        self.axis.vector(force * self.orientation.sign::<f64>())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal; the loop only shuts down from here.
    Stopped,
}

/// What one iteration saw and did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration index.
    pub frame: u64,
    pub status: DeviceStatus,
    pub handle_position: f64,
    pub cursor_position: f64,
    /// Force commanded to the device, in simulation orientation.
    pub handle_force: f64,
    pub observed_rate: u32,
}

/// Totals for a completed run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub iterations: u64,
    /// Polls that returned a non-zero status.
    pub fault_polls: u64,
    pub late_frames: u64,
    pub observed_rate: u32,
}

/// Single-threaded haptic loop over a device, a renderer and a clock.
pub struct ControlLoop<D: HapticDevice, R: Renderer, C: Clock> {
    config: LoopConfig,
    device: D,
    renderer: R,
    pacer: FramePacer<C>,
    scene: Scene<f64>,
    handle: usize,
    cursor: usize,
    state: LoopState,
    iterations: u64,
    fault_polls: u64,
    indicators: Indicators,
}

impl<D: HapticDevice, R: Renderer, C: Clock> ControlLoop<D, R, C> {
    /// Validate `config`, load firmware and build the scene.
    ///
    /// Configuration errors are returned before the device is touched. A
    /// firmware load failure is only logged; the device may still work.
    pub fn new(config: LoopConfig, mut device: D, renderer: R, clock: C) -> Result<Self, HapticError> {
        config.validate()?;

        let mut scene = Scene::new();
        let handle = scene.add_body(PointMass::kinematic(config.handle_start));
        let cursor = scene.add_body(PointMass::new(config.cursor_mass, config.cursor_start)?);
        let contact = ContactPair::new(handle, cursor, config.mapping.orientation, config.contact);
        scene.add_laws(contact.laws())?;
        scene.add_law(ForceLaw::Damping(Damping::new(cursor, config.damping)))?;

        if let Some(path) = config.firmware.as_deref() {
            let status = device.load_firmware(path);
            if status.is_ok() {
                log::debug!("firmware {} loaded", path);
            } else {
                log::warn!("firmware {} failed to load ({}), continuing", path, status);
            }
        }

        let indicators = Indicators { green: true, ..Indicators::OFF };
        device.set_indicators(indicators);

        log::debug!(
            "control loop ready: {} Hz, k = {}, loss = {}, damping = {}",
            config.target_rate_hz,
            config.contact.stiffness,
            config.contact.restitution_loss,
            config.damping
        );

        let pacer = FramePacer::with_window(clock, config.rate_window_ms);
        Ok(ControlLoop {
            config,
            device,
            renderer,
            pacer,
            scene,
            handle,
            cursor,
            state: LoopState::Running,
            iterations: 0,
            fault_polls: 0,
            indicators,
        })
    }

    /// Run one full iteration regardless of state.
    pub fn iterate<O: LoopObserver>(&mut self, observer: &mut O) -> IterationReport {
        let status = self.device.poll_io();
        if !status.is_ok() {
            self.fault_polls += 1;
            log::warn!("device poll returned {} at frame {}", status, self.iterations);
            observer.on_device_status(status);
        }
        self.show_status(status);

        let sim_position = self.config.mapping.to_sim(self.device.position());
        law::bind_position(self.scene.body_mut(self.handle), sim_position, 0.0, 1.0);

        self.scene.step(self.config.time_step(), observer);

        let handle_force = self.scene.body(self.handle).applied_force;
        self.device.set_force(self.config.mapping.to_device(handle_force));

        let observed_rate = self.pacer.advance(self.config.target_rate_hz);

        let report = IterationReport {
            frame: self.iterations,
            status,
            handle_position: self.scene.body(self.handle).position,
            cursor_position: self.scene.body(self.cursor).position,
            handle_force,
            observed_rate,
        };
        self.draw_overlay(&report);
        log::trace!(
            "{}FPS - handle {:.2} cursor {:.2} force {:.3}",
            observed_rate,
            report.handle_position,
            report.cursor_position,
            handle_force
        );

        self.iterations += 1;
        observer.on_iteration(&report);
        report
    }

    /// Iterate until `stop` is raised or the iteration limit is reached.
    ///
    /// The flag is checked between iterations, so the iteration in flight
    /// always completes. Leaves the loop in [`LoopState::Stopped`].
    pub fn run<O: LoopObserver>(&mut self, stop: &StopFlag, observer: &mut O) -> RunSummary {
        log::info!("control loop running at {} Hz", self.config.target_rate_hz);
        while self.state == LoopState::Running {
            if stop.is_stopped() {
                log::info!("stop requested after {} iterations", self.iterations);
                self.state = LoopState::Stopped;
                break;
            }
            if self.config.max_iterations.is_some_and(|max| self.iterations >= max) {
                log::info!("iteration limit {} reached", self.iterations);
                self.state = LoopState::Stopped;
                break;
            }
            self.iterate(observer);
        }
        self.summary()
    }

    /// Zero the force command, turn the indicators off and close the device.
    pub fn shutdown(mut self) -> D {
        self.state = LoopState::Stopped;
        self.device.set_force([0.0; 3]);
        self.device.set_indicators(Indicators::OFF);
        self.device.close();
        log::debug!("device closed after {} iterations", self.iterations);
        self.device
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            iterations: self.iterations,
            fault_polls: self.fault_polls,
            late_frames: self.pacer.late_frames(),
            observed_rate: self.pacer.observed_rate(),
        }
    }

    fn show_status(&mut self, status: DeviceStatus) {
        let indicators = Indicators {
            red: !status.is_ok(),
            green: status.is_ok(),
            blue: false,
        };
        if indicators != self.indicators {
            self.device.set_indicators(indicators);
            self.indicators = indicators;
        }
    }

    fn draw_overlay(&mut self, report: &IterationReport) {
        self.renderer.clear();
        self.renderer.draw_text(0, 0, &format!("{}FPS", report.observed_rate));
        self.renderer.draw_text(
            0,
            10,
            &format!(
                "handle {:+.2} cursor {:+.2} force {:+.3}",
                report.handle_position, report.cursor_position, report.handle_force
            ),
        );
        if !report.status.is_ok() {
            self.renderer.draw_text(0, 20, &format!("device {}", report.status));
        }
        self.renderer.present();
    }

    pub fn state(&self) -> LoopState { self.state }
    pub fn iterations(&self) -> u64 { self.iterations }
    pub fn config(&self) -> &LoopConfig { &self.config }
    pub fn scene(&self) -> &Scene<f64> { &self.scene }
    pub fn pacer(&self) -> &FramePacer<C> { &self.pacer }
    pub fn device(&self) -> &D { &self.device }
    pub fn renderer(&self) -> &R { &self.renderer }
    pub fn handle(&self) -> &PointMass<f64> { self.scene.body(self.handle) }
    pub fn cursor(&self) -> &PointMass<f64> { self.scene.body(self.cursor) }
}
