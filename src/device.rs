//! Haptic device capability interface and a deterministic simulated device.

use crate::error::HapticError;
use core::fmt;

/// Status code returned by device I/O. Zero means success.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceStatus(pub i32);

impl DeviceStatus {
    pub const OK: DeviceStatus = DeviceStatus(0);

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.0)
    }
}

/// Diagnostic LED state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Indicators {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Indicators {
    pub const OFF: Indicators = Indicators { red: false, green: false, blue: false };
}

/// Axis of the device workspace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// A vector that is `value` on this axis and zero elsewhere.
    pub fn vector(self, value: f64) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = value;
        v
    }
}

/// A force-feedback actuator.
///
/// Opening is left to each implementation's constructor; it must fail with
/// [`HapticError::DeviceOpen`] rather than hand back a dead device.
pub trait HapticDevice {
    fn load_firmware(&mut self, path: &str) -> DeviceStatus;

    /// Drive device I/O: refresh the cached position and send the last force
    /// command. Must be called once per loop iteration.
    fn poll_io(&mut self) -> DeviceStatus;

    /// Cached position in device units (metres).
    fn position(&self) -> [f64; 3];

    /// Force to apply on the next `poll_io`.
    fn set_force(&mut self, force: [f64; 3]);

    fn set_indicators(&mut self, indicators: Indicators);

    fn close(&mut self);
}

impl<D: HapticDevice + ?Sized> HapticDevice for &mut D {
    fn load_firmware(&mut self, path: &str) -> DeviceStatus { (**self).load_firmware(path) }
    fn poll_io(&mut self) -> DeviceStatus { (**self).poll_io() }
    fn position(&self) -> [f64; 3] { (**self).position() }
    fn set_force(&mut self, force: [f64; 3]) { (**self).set_force(force) }
    fn set_indicators(&mut self, indicators: Indicators) { (**self).set_indicators(indicators) }
    fn close(&mut self) { (**self).close() }
}

/// Stand-in device that sweeps one axis back and forth and records what it
/// is told.
///
/// Motion is a triangle wave in poll count; no wall clock is involved.
#[derive(Clone, Debug)]
pub struct SimulatedDevice {
    axis: Axis,
    lower: f64,
    upper: f64,
    period_polls: u64,
    polls: u64,
    position: [f64; 3],
    pending_force: [f64; 3],
    applied_force: [f64; 3],
    indicators: Indicators,
    firmware: bool,
    open: bool,
}

impl SimulatedDevice {
    /// Number of simulated devices on the bus.
    pub const COUNT: u32 = 1;

    /// Default sweep period in polls.
    pub const DEFAULT_PERIOD: u64 = 3200;

    /// Open device `index`, sweeping `axis` between `lower` and `upper`.
    pub fn open(index: u32, axis: Axis, lower: f64, upper: f64) -> Result<Self, HapticError> {
        if index >= Self::COUNT {
            return Err(HapticError::DeviceOpen { index });
        }
        let mut position = [0.0; 3];
        position[axis.index()] = lower;
        Ok(SimulatedDevice {
            axis,
            lower,
            upper,
            period_polls: Self::DEFAULT_PERIOD,
            polls: 0,
            position,
            pending_force: [0.0; 3],
            applied_force: [0.0; 3],
            indicators: Indicators::OFF,
            firmware: false,
            open: true,
        })
    }

    /// Polls per full sweep (lower to upper and back). Clamped to at least 2.
    pub fn with_period(mut self, period_polls: u64) -> Self {
        self.period_polls = period_polls.max(2);
        self
    }

    pub fn polls(&self) -> u64 { self.polls }
    /// Force sent by the most recent poll.
    pub fn applied_force(&self) -> [f64; 3] { self.applied_force }
    pub fn indicators(&self) -> Indicators { self.indicators }
    pub fn firmware_loaded(&self) -> bool { self.firmware }
    pub fn is_open(&self) -> bool { self.open }

    fn sweep(&self) -> f64 {
        let half = self.period_polls / 2;
        let phase = self.polls % self.period_polls;
        let t = if phase <= half {
            phase as f64 / half as f64
        } else {
            (self.period_polls - phase) as f64 / half as f64
        };
        self.lower + (self.upper - self.lower) * t
    }
}

impl HapticDevice for SimulatedDevice {
    fn load_firmware(&mut self, path: &str) -> DeviceStatus {
        if path.is_empty() {
            return DeviceStatus(-1);
        }
        self.firmware = true;
        DeviceStatus::OK
    }

    fn poll_io(&mut self) -> DeviceStatus {
        if !self.open {
            return DeviceStatus(-1);
        }
        self.applied_force = self.pending_force;
        self.polls += 1;
        self.position[self.axis.index()] = self.sweep();
        DeviceStatus::OK
    }

    fn position(&self) -> [f64; 3] {
        self.position
    }

    fn set_force(&mut self, force: [f64; 3]) {
        self.pending_force = force;
    }

    fn set_indicators(&mut self, indicators: Indicators) {
        self.indicators = indicators;
    }

    fn close(&mut self) {
        self.open = false;
    }
}
