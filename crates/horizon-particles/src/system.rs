//! Shared contract of the particle clouds

use crate::instance::{ParticleBuffers, ParticleInstance};
use crate::quality::QualityTier;
use horizon_core::{RandomSource, Vec3};

/// Per-tick inputs. Pull intensity and stress only modulate motion speed
/// and appearance; nothing here can destabilize a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTick {
    pub dt: f32,
    /// Total simulated time, drives pulses
    pub time: f32,
    pub pull_intensity: f32,
    /// Shell mean stress
    pub stress_hint: f32,
    /// Whether the attractor is enabled and pulling
    pub active: bool,
    /// Cloud center in the output frame, usually the localized attractor
    pub center: Vec3,
}

impl Default for ParticleTick {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            time: 0.0,
            pull_intensity: 0.0,
            stress_hint: 0.0,
            active: false,
            center: Vec3::ZERO,
        }
    }
}

/// A fixed-capacity pool advected by a closed-form law.
///
/// Particles leaving their domain are resampled in place. The pool is only
/// reallocated wholesale by [`ParticleSystem::initialize`], which a quality
/// change always goes through.
pub trait ParticleSystem {
    type Config: Copy;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn config(&self) -> &Self::Config;

    /// (Re)allocate every particle field at `capacity` and resample them all.
    fn initialize(&mut self, capacity: usize, config: Self::Config, rng: &mut dyn RandomSource);

    fn update(&mut self, tick: &ParticleTick, rng: &mut dyn RandomSource);

    fn quality(&self) -> QualityTier;

    /// Switch tier; reinitializes at the tier's fraction of the base capacity.
    /// Returns false when `tier` is already current.
    fn set_quality(&mut self, tier: QualityTier, rng: &mut dyn RandomSource) -> bool;

    /// Current pool size
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of in-place resamples since the last initialize
    fn resample_count(&self) -> u64;

    fn buffers(&self) -> &ParticleBuffers;

    fn pack_instances(&self, out: &mut Vec<ParticleInstance>) {
        self.buffers().pack_instances(out);
    }
}
