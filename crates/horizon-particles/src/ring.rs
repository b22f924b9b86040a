//! Photon ring: a thin band circling just outside the horizon

use crate::config::RingConfig;
use crate::instance::ParticleBuffers;
use crate::quality::QualityTier;
use crate::system::{ParticleSystem, ParticleTick};
use horizon_core::{clamp01, clamp_dt, RandomSource, Vec3};
use std::f32::consts::TAU;

pub struct PhotonRing {
    config: RingConfig,
    quality: QualityTier,
    horizon_radius: f32,

    angle: Vec<f32>,
    angular_speed: Vec<f32>,

    buffers: ParticleBuffers,
}

impl PhotonRing {
    /// The ring radius is fixed at `radius_factor * horizon_radius`.
    pub fn new(config: RingConfig, horizon_radius: f32, rng: &mut dyn RandomSource) -> Self {
        let mut ring = Self {
            config,
            quality: QualityTier::High,
            horizon_radius,
            angle: Vec::new(),
            angular_speed: Vec::new(),
            buffers: ParticleBuffers::default(),
        };
        ring.initialize(config.capacity, config, rng);
        ring
    }

    pub fn radius(&self) -> f32 {
        self.config.radius_factor * self.horizon_radius
    }

    pub fn angles(&self) -> &[f32] {
        &self.angle
    }

    pub fn is_visible(&self, pull: f32) -> bool {
        pull > self.config.visibility_threshold
    }

    fn write_outputs(&mut self, center: Vec3, pull: f32) {
        let alpha = if self.is_visible(pull) { clamp01(pull) } else { 0.0 };
        let radius = self.radius();
        for i in 0..self.angle.len() {
            let (s, c) = self.angle[i].sin_cos();
            // Faces the viewer, so it sits in the local XY plane
            let p = center + Vec3::new(radius * c, radius * s, 0.0);
            self.buffers
                .write(i, p, self.config.color, self.config.size, alpha);
        }
    }
}

impl ParticleSystem for PhotonRing {
    type Config = RingConfig;

    fn name(&self) -> &'static str {
        "ring"
    }

    fn config(&self) -> &RingConfig {
        &self.config
    }

    fn initialize(&mut self, capacity: usize, config: RingConfig, rng: &mut dyn RandomSource) {
        self.config = config;
        self.angle = (0..capacity).map(|_| rng.range(0.0, TAU)).collect();
        self.angular_speed = (0..capacity)
            .map(|_| rng.range(config.angular_speed_min, config.angular_speed_max))
            .collect();
        self.buffers.resize(capacity);
        self.write_outputs(Vec3::ZERO, 0.0);
    }

    fn update(&mut self, tick: &ParticleTick, _rng: &mut dyn RandomSource) {
        let dt = clamp_dt(tick.dt);
        for (angle, speed) in self.angle.iter_mut().zip(&self.angular_speed) {
            *angle = (*angle + speed * dt) % TAU;
        }
        self.write_outputs(tick.center, tick.pull_intensity);
    }

    fn quality(&self) -> QualityTier {
        self.quality
    }

    fn set_quality(&mut self, tier: QualityTier, rng: &mut dyn RandomSource) -> bool {
        if tier == self.quality {
            return false;
        }
        self.quality = tier;
        self.initialize(tier.capacity(self.config.capacity), self.config, rng);
        log::info!("[particles] ring resized to {}", self.len());
        true
    }

    fn len(&self) -> usize {
        self.angle.len()
    }

    /// The ring never leaves its domain, so nothing is ever resampled.
    fn resample_count(&self) -> u64 {
        0
    }

    fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::ParticleRng;

    fn visible_tick(pull: f32) -> ParticleTick {
        ParticleTick {
            pull_intensity: pull,
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn radius_tracks_horizon() {
        let mut rng = ParticleRng::new(1);
        let mut ring = PhotonRing::new(RingConfig::default(), 6.0, &mut rng);
        assert!((ring.radius() - 9.0).abs() < 1e-6);
        for _ in 0..300 {
            ring.update(&visible_tick(1.0), &mut rng);
        }
        for i in 0..ring.len() {
            assert!((ring.buffers().position(i).length() - 9.0).abs() < 1e-4);
        }
    }

    #[test]
    fn only_angle_advances() {
        let mut rng = ParticleRng::new(1);
        let mut ring = PhotonRing::new(RingConfig::default(), 6.0, &mut rng);
        let before = ring.angles().to_vec();
        ring.update(&visible_tick(1.0), &mut rng);
        let moved = ring
            .angles()
            .iter()
            .zip(&before)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(moved, ring.len());
    }

    #[test]
    fn hidden_below_threshold() {
        let mut rng = ParticleRng::new(1);
        let mut ring = PhotonRing::new(RingConfig::default(), 6.0, &mut rng);
        ring.update(&visible_tick(0.05), &mut rng);
        assert!(ring.buffers().opacity().iter().all(|&a| a == 0.0));
        let mut packed = Vec::new();
        ring.pack_instances(&mut packed);
        assert!(packed.is_empty());

        ring.update(&visible_tick(0.6), &mut rng);
        assert!(ring.buffers().opacity().iter().all(|&a| (a - 0.6).abs() < 1e-6));
        ring.pack_instances(&mut packed);
        assert_eq!(packed.len(), ring.len());
    }

    #[test]
    fn tier_change_reinitializes() {
        let mut rng = ParticleRng::new(1);
        let mut ring = PhotonRing::new(RingConfig::default(), 6.0, &mut rng);
        assert!(ring.set_quality(QualityTier::Low, &mut rng));
        assert_eq!(ring.len(), 160);
        assert!(ring.set_quality(QualityTier::High, &mut rng));
        assert_eq!(ring.len(), 400);
        assert!((ring.radius() - 9.0).abs() < 1e-6);
    }
}
