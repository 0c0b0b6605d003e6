//! Fixed set of point masses and the scripted laws acting between them.

use crate::error::HapticError;
use crate::float::Float;
use crate::law::ForceLaw;
use crate::observer::LoopObserver;
use crate::point_mass::PointMass;
use alloc::vec::Vec as AllocVec;

/// Bodies plus the laws applied to them once per iteration.
///
/// Positional laws always run before force laws, regardless of the order
/// they were added in, so a spring never reads a position that a binding
/// would overwrite later in the same iteration.
pub struct Scene<F: Float> {
    pub bodies: AllocVec<PointMass<F>>,
    laws: AllocVec<ForceLaw<F>>,
}

impl<F: Float> Scene<F> {
    pub fn new() -> Self {
        Scene {
            bodies: AllocVec::new(),
            laws: AllocVec::new(),
        }
    }

    pub fn add_body(&mut self, body: PointMass<F>) -> usize {
        let idx = self.bodies.len();
        self.bodies.push(body);
        idx
    }

    /// Append a law. Fails if it references a body that does not exist.
    pub fn add_law(&mut self, law: ForceLaw<F>) -> Result<(), HapticError> {
        let count = self.bodies.len();
        if let Some(&index) = law.bodies().iter().find(|&&i| i >= count) {
            return Err(HapticError::BodyOutOfBounds { index, count });
        }
        self.laws.push(law);
        Ok(())
    }

    pub fn add_laws<I>(&mut self, laws: I) -> Result<(), HapticError>
    where
        I: IntoIterator<Item = ForceLaw<F>>,
    {
        for law in laws {
            self.add_law(law)?;
        }
        Ok(())
    }

    /// Apply positional laws, then force laws.
    pub fn apply_laws(&mut self) {
        for law in self.laws.iter().filter(|l| l.is_positional()) {
            law.apply(&mut self.bodies);
        }
        for law in self.laws.iter().filter(|l| !l.is_positional()) {
            law.apply(&mut self.bodies);
        }
    }

    /// Consume every queued force: dynamic bodies step, kinematic bodies
    /// only latch their force.
    pub fn integrate(&mut self, dt: F) {
        for body in self.bodies.iter_mut() {
            if body.is_kinematic() {
                body.consume_queued_force();
            } else {
                body.step(dt);
            }
        }
    }

    /// One simulation iteration: laws, then integration.
    pub fn step<O: LoopObserver>(&mut self, dt: F, observer: &mut O) {
        self.apply_laws();
        observer.on_laws_applied();
        self.integrate(dt);
        observer.on_integrate();
    }

    pub fn body_count(&self) -> usize { self.bodies.len() }
    pub fn law_count(&self) -> usize { self.laws.len() }
    pub fn body(&self, index: usize) -> &PointMass<F> { &self.bodies[index] }
    pub fn body_mut(&mut self, index: usize) -> &mut PointMass<F> { &mut self.bodies[index] }
}

impl<F: Float> Default for Scene<F> {
    fn default() -> Self {
        Self::new()
    }
}
