//! Observer trait for monitoring simulation and control-loop progress.

use crate::control::IterationReport;
use crate::device::DeviceStatus;

/// Trait for observing the control loop.
///
/// Implement this to record diagnostics (poll status history, force traces,
/// timing). All methods have default no-op implementations.
pub trait LoopObserver {
    /// Called after every scripted law has been applied for this iteration.
    fn on_laws_applied(&mut self) {}

    /// Called after all bodies have been integrated.
    fn on_integrate(&mut self) {}

    /// Called when the device reports a non-zero status.
    fn on_device_status(&mut self, _status: DeviceStatus) {}

    /// Called once an iteration is fully complete.
    fn on_iteration(&mut self, _report: &IterationReport) {}
}

/// A no-op observer. Use as default when no observation is needed.
pub struct NoOpObserver;

impl LoopObserver for NoOpObserver {}
