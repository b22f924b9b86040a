//! Horizon Runtime - frame loop infrastructure
//!
//! Provides the pieces that drive the components in their fixed order:
//! - `FrameClock` - simulated time with clamped per-tick steps
//! - `SimConfig` - every component config in one TOML document
//! - `SimEvent` / `EventBus` - diagnostics queue drained by the caller
//! - `Simulation` - field, shell, swarm, then the three particle clouds

mod clock;
mod config;
mod event;
mod event_bus;
mod simulation;

pub use clock::FrameClock;
pub use config::SimConfig;
pub use event::SimEvent;
pub use event_bus::EventBus;
pub use simulation::{Simulation, TickInput, TickReport};
