//! Horizon Particles - the three cosmetic particle clouds
//!
//! Each cloud is a fixed-capacity pool advected by a closed-form law:
//! - [`AccretionDisk`]: particles orbit and spiral inward, reheating as they fall
//! - [`AxialJets`]: particles stream out along the spin axis and fan out
//! - [`PhotonRing`]: particles circle at a fixed radius around the horizon
//!
//! Pools never consult the gravity field. They read the pull intensity and
//! the shell's stress through [`ParticleTick`] and resample particles in place
//! when they leave their domain.

mod config;
mod disk;
mod instance;
mod jets;
mod quality;
mod ring;
mod system;

pub use config::{DiskConfig, JetConfig, RingConfig};
pub use disk::AccretionDisk;
pub use instance::{ParticleBuffers, ParticleInstance};
pub use jets::AxialJets;
pub use quality::QualityTier;
pub use ring::PhotonRing;
pub use system::{ParticleSystem, ParticleTick};
