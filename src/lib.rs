//! Real-time haptic control loop for contact-stability experiments.
//!
//! `hapticsim` samples a force-feedback actuator, runs a small 1-D
//! simulation of point masses coupled by one-sided contact springs, and
//! commands the handle's reaction force back to the actuator. Spring,
//! damping and rate parameters are swept to probe loop stability.
//!
//! # Features
//!
//! - **Point masses**: semi-implicit Euler with explicit force queues
//! - **Force laws**: damping, unilateral contact springs, position binding and limits
//! - **Contact pairs**: four-spring virtual walls with restitution loss
//! - **Frame pacer**: busy-wait throttling with windowed rate estimation
//! - **Control loop**: device/renderer/clock traits, cooperative stop
//! - **Observable**: monitor each iteration via the `LoopObserver` trait
//! - **`no_std` compatible**: the core only needs `alloc`

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod float;
pub mod point_mass;
pub mod law;
pub mod scene;
pub mod contact;
pub mod pacer;
pub mod device;
pub mod render;
pub mod cancel;
pub mod control;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use point_mass::PointMass;
pub use law::{bind_position, damping, position_limits, unilateral_spring, ForceLaw};
pub use scene::Scene;
pub use contact::{ContactConfig, ContactPair, Orientation};
pub use pacer::{Clock, FramePacer, DEFAULT_WINDOW_MS};
#[cfg(feature = "std")]
pub use pacer::MonotonicClock;
pub use device::{Axis, DeviceStatus, HapticDevice, Indicators, SimulatedDevice};
pub use render::{LogRenderer, NullRenderer, Renderer};
pub use cancel::{StopFlag, StopRequest};
pub use control::{ControlLoop, HandleMapping, IterationReport, LoopState, RunSummary};
pub use observer::{LoopObserver, NoOpObserver};
pub use config::LoopConfig;
pub use error::HapticError;
