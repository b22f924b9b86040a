//! Horizon Field - the simulated gravity well ("attractor")
//!
//! The field is owned by [`GravityField`], which the caller mutates between
//! ticks. Components never read the owner during a tick: they receive a
//! [`FieldSnapshot`], an immutable copy that answers
//! [`FieldSnapshot::compute_effect`] for any point.

mod config;
mod field;

pub use config::AttractorConfig;
pub use field::{FieldSnapshot, GravityEffect, GravityField};
