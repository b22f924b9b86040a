//! Horizon Shell - deformable mesh solver
//!
//! Provides the per-vertex spring-mass integrator for the shell:
//! - Springs toward a breathing rest shape
//! - Actor grab (pinch) and push interaction
//! - Repulsion from the node swarm living inside the shell
//! - Attractor suction, swirl, tidal stretch, absorption and capture
//! - Per-vertex stress and a cold-to-hot color ramp
//!
//! All buffers are struct-of-arrays, allocated once from a [`ShellGeometry`]
//! and mutated in place every tick.

mod config;
mod deformer;
mod geometry;
mod grab;
mod ramp;

pub use config::ShellConfig;
pub use deformer::{NodeProbe, ShellDeformer, ShellStats, ShellTick};
pub use geometry::ShellGeometry;
pub use grab::{ActorId, ActorInput, GrabAnchor, GrabEvent, GrabPhase, GrabTracker};
pub use ramp::stress_color;
