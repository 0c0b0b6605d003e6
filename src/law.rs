//! Force laws: damping, unilateral contact springs, positional binding and
//! position limits.
//!
//! Force laws only read positions and velocities and add into
//! `queued_force`, so they commute with each other. Positional laws
//! ([`bind_position`], [`position_limits`]) overwrite `position` and must run
//! before any force law that reads the same body.

use crate::float::Float;
use crate::point_mass::PointMass;

/// Linear viscous drag: queue `-coefficient * velocity`.
///
/// A negative coefficient injects energy and is only useful for
/// deliberately destabilising a run.
pub fn damping<F: Float>(target: &mut PointMass<F>, coefficient: F) {
    let force = target.velocity * -coefficient;
    target.queue_force(force);
}

/// Rigid positional constraint: `position = reference * proportion + offset`.
///
/// Ignores the target's velocity and queued force.
pub fn bind_position<F: Float>(target: &mut PointMass<F>, reference: F, offset: F, proportion: F) {
    target.position = reference * proportion + offset;
}

/// One-sided contact spring.
///
/// With `penetration = (reference + offset) - target.position`, force is
/// queued only when the penetration has the same sign as
/// `spring_coefficient`; the queued force is
/// `sign(k) * penetration * k`, i.e. `|k| * penetration`. A zero coefficient
/// never produces a non-zero force.
///
/// Returns the force that was queued (zero when the spring is slack).
pub fn unilateral_spring<F: Float>(
    target: &mut PointMass<F>,
    reference: F,
    spring_coefficient: F,
    offset: F,
) -> F {
    let penetration = (reference + offset) - target.position;
    if penetration.sign() != spring_coefficient.sign() {
        return F::zero();
    }
    let force = spring_coefficient.sign() * penetration * spring_coefficient;
    target.queue_force(force);
    force
}

/// Clamp position into `[lower, upper]`.
pub fn position_limits<F: Float>(target: &mut PointMass<F>, lower: F, upper: F) {
    target.position = target.position.clamp(lower, upper);
}

/// A scripted law between bodies of a [`Scene`](crate::scene::Scene),
/// addressed by index.
#[derive(Clone, Debug, PartialEq)]
pub enum ForceLaw<F: Float> {
    Damping(Damping<F>),
    Bind(Bind<F>),
    UnilateralSpring(UnilateralSpring<F>),
    Limits(Limits<F>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Damping<F: Float> {
    pub target: usize,
    pub coefficient: F,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bind<F: Float> {
    pub target: usize,
    pub reference: usize,
    pub offset: F,
    pub proportion: F,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnilateralSpring<F: Float> {
    pub target: usize,
    pub reference: usize,
    pub spring_coefficient: F,
    pub offset: F,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Limits<F: Float> {
    pub target: usize,
    pub lower: F,
    pub upper: F,
}

impl<F: Float> Damping<F> {
    pub fn new(target: usize, coefficient: F) -> Self {
        Damping { target, coefficient }
    }
}

impl<F: Float> Bind<F> {
    pub fn new(target: usize, reference: usize, offset: F, proportion: F) -> Self {
        Bind { target, reference, offset, proportion }
    }
}

impl<F: Float> UnilateralSpring<F> {
    pub fn new(target: usize, reference: usize, spring_coefficient: F, offset: F) -> Self {
        UnilateralSpring { target, reference, spring_coefficient, offset }
    }
}

impl<F: Float> Limits<F> {
    pub fn new(target: usize, lower: F, upper: F) -> Self {
        Limits { target, lower, upper }
    }
}

impl<F: Float> ForceLaw<F> {
    /// True for laws that overwrite position rather than queue force.
    pub fn is_positional(&self) -> bool {
        matches!(self, ForceLaw::Bind(_) | ForceLaw::Limits(_))
    }

    /// Every body index this law touches.
    pub fn bodies(&self) -> [usize; 2] {
        match self {
            ForceLaw::Damping(l) => [l.target, l.target],
            ForceLaw::Bind(l) => [l.target, l.reference],
            ForceLaw::UnilateralSpring(l) => [l.target, l.reference],
            ForceLaw::Limits(l) => [l.target, l.target],
        }
    }

    /// Apply to `bodies`. Indices must be in range.
    pub fn apply(&self, bodies: &mut [PointMass<F>]) {
        match self {
            ForceLaw::Damping(l) => damping(&mut bodies[l.target], l.coefficient),
            ForceLaw::Bind(l) => {
                let reference = bodies[l.reference].position;
                bind_position(&mut bodies[l.target], reference, l.offset, l.proportion);
            }
            ForceLaw::UnilateralSpring(l) => {
                let reference = bodies[l.reference].position;
                unilateral_spring(&mut bodies[l.target], reference, l.spring_coefficient, l.offset);
            }
            ForceLaw::Limits(l) => position_limits(&mut bodies[l.target], l.lower, l.upper),
        }
    }
}
