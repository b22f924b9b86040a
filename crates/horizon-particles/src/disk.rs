//! Orbiting accretion disk

use crate::config::DiskConfig;
use crate::instance::ParticleBuffers;
use crate::quality::QualityTier;
use crate::system::{ParticleSystem, ParticleTick};
use horizon_core::{clamp01, clamp_dt, lerp_color, lerp_f32, RandomSource, Vec3};
use std::f32::consts::TAU;

pub struct AccretionDisk {
    config: DiskConfig,
    quality: QualityTier,
    resamples: u64,

    radius: Vec<f32>,
    angle: Vec<f32>,
    base_depth: Vec<f32>,
    heat: Vec<f32>,
    speed_mul: Vec<f32>,

    buffers: ParticleBuffers,
}

impl AccretionDisk {
    pub fn new(config: DiskConfig, rng: &mut dyn RandomSource) -> Self {
        let mut disk = Self {
            config,
            quality: QualityTier::High,
            resamples: 0,
            radius: Vec::new(),
            angle: Vec::new(),
            base_depth: Vec::new(),
            heat: Vec::new(),
            speed_mul: Vec::new(),
            buffers: ParticleBuffers::default(),
        };
        disk.initialize(config.capacity, config, rng);
        disk
    }

    pub fn radii(&self) -> &[f32] {
        &self.radius
    }

    pub fn angles(&self) -> &[f32] {
        &self.angle
    }

    pub fn heat(&self) -> &[f32] {
        &self.heat
    }

    /// `(inner / r)^k`, 1 at the inner edge and falling outward
    pub fn falloff(&self, radius: f32) -> f32 {
        (self.config.inner_radius / radius.max(self.config.inner_radius))
            .powf(self.config.falloff_exponent)
    }

    /// Radius a particle at `radius` reaches after one step, before any resample
    pub fn next_radius(&self, radius: f32, dt: f32, pull: f32) -> f32 {
        let drive = 1.0 + self.config.pull_boost * clamp01(pull);
        radius - self.config.spiral_in_rate * drive * dt * self.falloff(radius)
    }

    /// Fresh particle biased toward the outer band
    fn resample(&mut self, i: usize, rng: &mut dyn RandomSource) {
        let c = &self.config;
        let band = c.outer_radius - c.inner_radius;
        self.radius[i] = c.outer_radius - band * rng.next_f32().powf(c.outer_bias);
        self.angle[i] = rng.range(0.0, TAU);
        self.base_depth[i] = rng.range(-c.thickness, c.thickness);
        self.speed_mul[i] = rng.range(c.speed_min, c.speed_max);
    }

    fn heat_at(&self, radius: f32) -> f32 {
        let c = &self.config;
        let t = clamp01(1.0 - (radius - c.inner_radius) / (c.outer_radius - c.inner_radius));
        t.powf(c.heat_gain)
    }

    fn write_outputs(&mut self, center: Vec3, pull: f32) {
        let c = self.config;
        let (sin_t, cos_t) = c.tilt.sin_cos();
        let alpha = lerp_f32(c.idle_opacity, c.max_opacity, clamp01(pull));
        for i in 0..self.radius.len() {
            let r = self.radius[i];
            let (s, co) = self.angle[i].sin_cos();
            let (x, y, z) = (r * co, self.base_depth[i], r * s);
            let local = Vec3::new(x, y * cos_t - z * sin_t, y * sin_t + z * cos_t);
            let heat = self.heat[i];
            self.buffers.write(
                i,
                center + local,
                lerp_color(c.cold_color, c.hot_color, heat),
                c.size * (1.0 + 0.5 * heat),
                alpha,
            );
        }
    }
}

impl ParticleSystem for AccretionDisk {
    type Config = DiskConfig;

    fn name(&self) -> &'static str {
        "disk"
    }

    fn config(&self) -> &DiskConfig {
        &self.config
    }

    fn initialize(&mut self, capacity: usize, config: DiskConfig, rng: &mut dyn RandomSource) {
        self.config = config;
        self.resamples = 0;
        self.radius = vec![0.0; capacity];
        self.angle = vec![0.0; capacity];
        self.base_depth = vec![0.0; capacity];
        self.heat = vec![0.0; capacity];
        self.speed_mul = vec![1.0; capacity];
        self.buffers.resize(capacity);

        let band = config.outer_radius - config.inner_radius;
        for i in 0..capacity {
            self.resample(i, rng);
            // Spread the first generation across the whole band
            self.radius[i] = config.inner_radius + band * rng.next_f32();
            self.heat[i] = self.heat_at(self.radius[i]);
        }
        self.write_outputs(Vec3::ZERO, 0.0);
    }

    fn update(&mut self, tick: &ParticleTick, rng: &mut dyn RandomSource) {
        let dt = clamp_dt(tick.dt);
        let pull = clamp01(tick.pull_intensity);
        let drive = 1.0 + self.config.pull_boost * pull;

        for i in 0..self.radius.len() {
            let r = self.radius[i];
            let f = self.falloff(r);
            self.angle[i] =
                (self.angle[i] + self.config.orbit_speed * self.speed_mul[i] * drive * dt * f) % TAU;

            let next = self.next_radius(r, dt, pull);
            if next < self.config.inner_radius {
                self.resample(i, rng);
                self.resamples += 1;
            } else {
                self.radius[i] = next;
            }
            self.heat[i] = self.heat_at(self.radius[i]);
        }

        self.write_outputs(tick.center, pull);
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
        log::info!("[particles] disk resized to {}", self.len());
        true
    }

    fn len(&self) -> usize {
        self.radius.len()
    }

    fn resample_count(&self) -> u64 {
        self.resamples
    }

    fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::ParticleRng;

    fn tick(pull: f32) -> ParticleTick {
        ParticleTick {
            pull_intensity: pull,
            active: pull > 0.01,
            ..Default::default()
        }
    }

    #[test]
    fn radius_stays_in_band_for_ten_thousand_ticks() {
        let mut rng = ParticleRng::new(42);
        let config = DiskConfig {
            capacity: 300,
            ..Default::default()
        };
        let mut disk = AccretionDisk::new(config, &mut rng);
        let lo = config.inner_radius * 0.999;
        for t in 0..10_000 {
            let pull = if t % 2000 < 1000 { 1.0 } else { 0.0 };
            disk.update(&tick(pull), &mut rng);
            for &r in disk.radii() {
                assert!(r >= lo && r <= config.outer_radius, "radius {r} escaped");
            }
        }
        assert!(disk.resample_count() > 0);
    }

    #[test]
    fn resample_happens_exactly_on_inner_crossing() {
        let mut rng = ParticleRng::new(7);
        let config = DiskConfig {
            capacity: 200,
            spiral_in_rate: 6.0,
            ..Default::default()
        };
        let mut disk = AccretionDisk::new(config, &mut rng);
        let dt = 1.0 / 60.0;
        for _ in 0..600 {
            let expected = disk
                .radii()
                .iter()
                .filter(|&&r| disk.next_radius(r, dt, 1.0) < config.inner_radius)
                .count() as u64;
            let before = disk.resample_count();
            disk.update(&tick(1.0), &mut rng);
            assert_eq!(disk.resample_count() - before, expected);
        }
    }

    #[test]
    fn inner_particles_run_hotter() {
        let mut rng = ParticleRng::new(3);
        let disk = AccretionDisk::new(DiskConfig::default(), &mut rng);
        let c = disk.config();
        assert_eq!(disk.heat_at(c.inner_radius), 1.0);
        assert_eq!(disk.heat_at(c.outer_radius), 0.0);
        assert!(disk.heat_at(10.0) > disk.heat_at(20.0));
    }

    #[test]
    fn opacity_follows_pull() {
        let mut rng = ParticleRng::new(3);
        let config = DiskConfig {
            capacity: 10,
            ..Default::default()
        };
        let mut disk = AccretionDisk::new(config, &mut rng);
        disk.update(&tick(0.0), &mut rng);
        let idle = disk.buffers().opacity()[0];
        disk.update(&tick(1.0), &mut rng);
        let full = disk.buffers().opacity()[0];
        assert!((idle - config.idle_opacity).abs() < 1e-6);
        assert!((full - config.max_opacity).abs() < 1e-6);
    }

    #[test]
    fn quality_change_reallocates() {
        let mut rng = ParticleRng::new(5);
        let mut disk = AccretionDisk::new(DiskConfig::default(), &mut rng);
        assert_eq!(disk.len(), 2000);
        assert!(disk.set_quality(QualityTier::Medium, &mut rng));
        assert_eq!(disk.len(), 1400);
        assert_eq!(disk.buffers().positions().len(), 1400 * 3);
        assert!(!disk.set_quality(QualityTier::Medium, &mut rng));
        assert!(disk.set_quality(QualityTier::Low, &mut rng));
        assert_eq!(disk.len(), 800);
        assert_eq!(disk.resample_count(), 0);
    }

    #[test]
    fn positions_are_centered_on_tick_center() {
        let mut rng = ParticleRng::new(8);
        let config = DiskConfig {
            capacity: 50,
            thickness: 0.0,
            ..Default::default()
        };
        let mut disk = AccretionDisk::new(config, &mut rng);
        let center = Vec3::new(3.0, -2.0, 1.0);
        disk.update(
            &ParticleTick {
                center,
                ..Default::default()
            },
            &mut rng,
        );
        for i in 0..disk.len() {
            let d = disk.buffers().position(i).distance(&center);
            assert!((d - disk.radii()[i]).abs() < 1e-3);
        }
    }
}
