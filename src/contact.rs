//! Virtual walls between a handle and a cursor built from unilateral springs.

use crate::error::HapticError;
use crate::float::Float;
use crate::law::{ForceLaw, UnilateralSpring};
use alloc::vec::Vec as AllocVec;

/// Which side of the cursor the handle sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Handle below the cursor (negative positions).
    #[default]
    Below,
    /// Handle above the cursor; every coefficient and offset is negated.
    Above,
}

impl Orientation {
    pub fn sign<F: Float>(self) -> F {
        match self {
            Orientation::Below => F::one(),
            Orientation::Above => -F::one(),
        }
    }
}

/// Parameters for a handle/cursor contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactConfig<F: Float> {
    /// Spring stiffness `k`.
    pub stiffness: F,
    /// Contact distance between body centres (two radii).
    pub offset: F,
    /// Fraction of the handle-side force returned to the cursor, in [0, 1].
    pub restitution_loss: F,
    /// Extra gain on the cursor's return force when the handle pushes.
    pub push: F,
    /// Extra gain on the cursor's return force when the handle pulls.
    pub pull: F,
}

impl<F: Float> Default for ContactConfig<F> {
    fn default() -> Self {
        ContactConfig {
            stiffness: F::from_f64(5.0),
            offset: F::from_f64(0.1),
            restitution_loss: F::from_f64(0.9),
            push: F::one(),
            pull: F::one(),
        }
    }
}

impl<F: Float> ContactConfig<F> {
    pub fn validate(&self) -> Result<(), HapticError> {
        for (name, v) in [
            ("stiffness", self.stiffness),
            ("contact offset", self.offset),
            ("push gain", self.push),
            ("pull gain", self.pull),
        ] {
            if !v.is_finite() {
                return Err(HapticError::non_finite(name));
            }
        }
        let loss = self.restitution_loss;
        if !loss.is_finite() || loss < F::zero() || loss > F::one() {
            return Err(HapticError::InvalidRestitution);
        }
        Ok(())
    }
}

/// The four springs that make a handle feel a pair of walls around a cursor.
///
/// The handle side uses the full stiffness; the cursor side is attenuated by
/// the restitution loss and the push/pull gains.
pub struct ContactPair<F: Float> {
    pub handle: usize,
    pub cursor: usize,
    pub orientation: Orientation,
    pub config: ContactConfig<F>,
}

impl<F: Float> ContactPair<F> {
    pub fn new(handle: usize, cursor: usize, orientation: Orientation, config: ContactConfig<F>) -> Self {
        ContactPair { handle, cursor, orientation, config }
    }

    pub fn springs(&self) -> [UnilateralSpring<F>; 4] {
        let s = self.orientation.sign::<F>();
        let c = &self.config;
        let k = c.stiffness * s;
        let d = c.offset * s;
        let returned = k * c.restitution_loss;
        [
            UnilateralSpring::new(self.handle, self.cursor, -k, -d),
            UnilateralSpring::new(self.cursor, self.handle, returned * c.push, d),
            UnilateralSpring::new(self.handle, self.cursor, k, d),
            UnilateralSpring::new(self.cursor, self.handle, -returned * c.pull, -d),
        ]
    }

    pub fn laws(&self) -> AllocVec<ForceLaw<F>> {
        self.springs().into_iter().map(ForceLaw::UnilateralSpring).collect()
    }
}
