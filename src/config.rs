//! Configuration for the control loop.

use crate::contact::{ContactConfig, Orientation};
use crate::control::HandleMapping;
use crate::device::Axis;
use crate::error::HapticError;
use crate::pacer::DEFAULT_WINDOW_MS;
use alloc::string::String;

/// Firmware image loaded into the device at start-up by default.
pub const DEFAULT_FIRMWARE: &str = "firmware/novint_T2.bin";

/// Everything the control loop needs to know before it starts.
///
/// # Builder Pattern
/// ```
/// use hapticsim::config::LoopConfig;
///
/// let config = LoopConfig::new()
///     .with_target_rate(1000)
///     .with_stiffness(8.0)
///     .with_damping(0.2)
///     .with_max_iterations(5000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LoopConfig {
    /// Loop rate in Hz. Also fixes the integration step at `1 / rate`.
    /// Default: 1600.
    pub target_rate_hz: u32,
    /// Handle/cursor contact springs.
    pub contact: ContactConfig<f64>,
    /// Viscous damping on the cursor. Default: 0.1.
    pub damping: f64,
    /// Default: 0.1.
    pub cursor_mass: f64,
    pub cursor_start: f64,
    /// Handle position before the first device reading. Default: -1.
    pub handle_start: f64,
    /// Device axis and range mapped onto the handle.
    pub mapping: HandleMapping,
    /// Rate-estimation window. Default: 2000 ms.
    pub rate_window_ms: u32,
    /// Firmware image to load; `None` skips loading.
    pub firmware: Option<String>,
    /// Stop after this many iterations even without a stop request.
    pub max_iterations: Option<u64>,
}

impl LoopConfig {
    pub fn new() -> Self {
        LoopConfig {
            target_rate_hz: 1600,
            contact: ContactConfig::default(),
            damping: 0.1,
            cursor_mass: 0.1,
            cursor_start: 0.0,
            handle_start: -1.0,
            mapping: HandleMapping::default(),
            rate_window_ms: DEFAULT_WINDOW_MS,
            firmware: Some(String::from(DEFAULT_FIRMWARE)),
            max_iterations: None,
        }
    }

    pub fn with_target_rate(mut self, hz: u32) -> Self {
        self.target_rate_hz = hz;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.contact.stiffness = stiffness;
        self
    }

    pub fn with_restitution_loss(mut self, loss: f64) -> Self {
        self.contact.restitution_loss = loss;
        self
    }

    pub fn with_contact_offset(mut self, offset: f64) -> Self {
        self.contact.offset = offset;
        self
    }

    /// Set the cursor return gains for push and pull contact.
    pub fn with_push_pull(mut self, push: f64, pull: f64) -> Self {
        self.contact.push = push;
        self.contact.pull = pull;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_cursor_mass(mut self, mass: f64) -> Self {
        self.cursor_mass = mass;
        self
    }

    pub fn with_mapping(mut self, mapping: HandleMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Put the handle above the cursor and mirror its device axis.
    pub fn mirrored(mut self) -> Self {
        self.mapping.orientation = Orientation::Above;
        self.handle_start = -self.handle_start;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.mapping.axis = axis;
        self
    }

    pub fn with_rate_window(mut self, window_ms: u32) -> Self {
        self.rate_window_ms = window_ms;
        self
    }

    pub fn with_firmware(mut self, path: Option<String>) -> Self {
        self.firmware = path;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Integration step in seconds.
    pub fn time_step(&self) -> f64 {
        1.0 / self.target_rate_hz as f64
    }

    /// Reject anything that would only fail once the loop is running.
    pub fn validate(&self) -> Result<(), HapticError> {
        if self.target_rate_hz == 0 {
            return Err(HapticError::InvalidRate);
        }
        let dt = self.time_step();
        if !dt.is_finite() || dt <= 0.0 {
            return Err(HapticError::InvalidTimeStep);
        }
        if !self.cursor_mass.is_finite() || self.cursor_mass < 0.0 {
            return Err(HapticError::InvalidMass);
        }
        for (name, v) in [
            ("damping", self.damping),
            ("cursor start", self.cursor_start),
            ("handle start", self.handle_start),
        ] {
            if !v.is_finite() {
                return Err(HapticError::non_finite(name));
            }
        }
        if self.rate_window_ms == 0 {
            return Err(HapticError::InvalidWindow);
        }
        self.mapping.validate()?;
        self.contact.validate()
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new()
    }
}
