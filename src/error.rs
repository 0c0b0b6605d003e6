//! Error types for simulation setup and device bring-up.

use thiserror::Error;

/// Errors that prevent the control loop from starting.
///
/// Everything here is detected at construction time. Per-iteration device
/// trouble is reported through [`DeviceStatus`](crate::device::DeviceStatus)
/// instead and never stops a running loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HapticError {
    /// Mass must be non-negative and finite.
    #[error("mass must be non-negative and finite")]
    InvalidMass,
    /// Time step must be positive and finite.
    #[error("time step must be positive and finite")]
    InvalidTimeStep,
    /// Target rate must be positive when the loop integrates with `1 / rate`.
    #[error("target rate must be positive")]
    InvalidRate,
    /// A coefficient or position was NaN or infinite.
    #[error("{name} must be finite")]
    InvalidCoefficient {
        /// Name of the offending parameter.
        name: &'static str,
    },
    /// Restitution loss must lie in [0, 1].
    #[error("restitution loss must be in [0, 1]")]
    InvalidRestitution,
    /// Handle range must be non-empty.
    #[error("handle range must satisfy min < max")]
    InvalidRange,
    /// Rate-estimation window must be at least one millisecond.
    #[error("rate window must be at least 1 ms")]
    InvalidWindow,
    /// A scripted law referenced a body that does not exist.
    #[error("body index {index} out of bounds (count: {count})")]
    BodyOutOfBounds {
        /// Requested body index.
        index: usize,
        /// Number of bodies in the scene.
        count: usize,
    },
    /// The haptic device could not be opened.
    #[error("failed to open haptic device {index}")]
    DeviceOpen {
        /// Device index passed to `open`.
        index: u32,
    },
}

impl HapticError {
    /// Creates a non-finite coefficient error.
    #[must_use]
    pub const fn non_finite(name: &'static str) -> Self {
        Self::InvalidCoefficient { name }
    }
}
