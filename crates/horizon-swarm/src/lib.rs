//! Horizon Swarm - point masses drifting inside the shell
//!
//! Nodes live in the shell's local space, relative to its live centroid.
//! Each tick they drift, get sucked and swirled by the attractor, absorb
//! near its horizon, and bounce off the shell's current mean radius.

mod config;
mod swarm;

pub use config::SwarmConfig;
pub use swarm::{NodeSwarm, SwarmTick};
