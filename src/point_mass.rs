//! One-dimensional point masses with explicit force accumulation.

use crate::error::HapticError;
use crate::float::Float;

/// A 1-D body driven by queued forces and semi-implicit Euler integration.
///
/// A zero `mass` marks a kinematic body: the integrator never recomputes its
/// acceleration, so forces do not move it. Its position can still be
/// overwritten by a positional law or by the device.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointMass<F: Float> {
    pub mass: F,
    pub position: F,
    pub velocity: F,
    pub acceleration: F,
    /// Force consumed by the most recent step.
    pub applied_force: F,
    /// Accumulator written by force laws; zeroed by every step.
    pub queued_force: F,
}

impl<F: Float> PointMass<F> {
    /// Create a body at rest. Rejects negative or non-finite mass.
    pub fn new(mass: F, position: F) -> Result<Self, HapticError> {
        if !mass.is_finite() || mass < F::zero() {
            return Err(HapticError::InvalidMass);
        }
        if !position.is_finite() {
            return Err(HapticError::non_finite("position"));
        }
        Ok(PointMass {
            mass,
            position,
            ..Self::default()
        })
    }

    /// Create a zero-mass body at rest.
    pub fn kinematic(position: F) -> Self {
        PointMass {
            position,
            ..Self::default()
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.mass <= F::zero()
    }

    /// Add to the queued force for this iteration.
    pub fn queue_force(&mut self, force: F) {
        self.queued_force += force;
    }

    /// Advance one time step using the queued force, then clear it.
    pub fn step(&mut self, dt: F) {
        debug_assert!(dt > F::zero(), "step requires dt > 0");
        self.applied_force = self.queued_force;
        if self.mass > F::zero() {
            self.acceleration = self.applied_force / self.mass;
        }
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.queued_force = F::zero();
    }

    /// Latch the queued force into `applied_force` and clear it without
    /// moving the body.
    ///
    /// Handles bound to a device take this path: their position comes from
    /// the hardware every iteration and only their reaction force matters.
    pub fn consume_queued_force(&mut self) -> F {
        self.applied_force = self.queued_force;
        self.queued_force = F::zero();
        self.applied_force
    }
}
