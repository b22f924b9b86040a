//! Horizon Core - Foundational types for the Horizon simulation core
//!
//! This crate provides the types every other Horizon crate depends on:
//! - `Vec3`, `Frame` - Spatial types and explicit local/world transforms
//! - `smoothstep`, `lerp_f32`, `clamp_dt` - Shared scalar helpers
//! - `RandomSource`, `ParticleRng` - Injectable, seedable pseudo-randomness
//! - Error types, `Result` alias and `StepOutcome`

mod error;
mod math;
mod rng;
mod types;

pub use error::{HorizonError, Result, StepOutcome};
pub use math::{clamp01, clamp_dt, lerp_color, lerp_f32, smoothstep, DT_MAX, DT_MIN};
pub use rng::{ParticleRng, RandomSource};
pub use types::{Frame, Vec3};
