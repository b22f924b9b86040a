//! Diagnostics emitted by the frame loop

use horizon_particles::QualityTier;
use horizon_shell::ActorId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A component hit non-finite state and was reset to rest
    Recovered {
        component: &'static str,
        tick: u64,
        reason: String,
    },
    /// Particle pools were reallocated for a new tier
    QualityChanged {
        tier: QualityTier,
        particles: usize,
    },
    Grabbed {
        actor: ActorId,
        vertex: usize,
    },
    Released {
        actor: ActorId,
        vertex: usize,
    },
}
