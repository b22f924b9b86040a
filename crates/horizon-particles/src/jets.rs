//! Bipolar jets streaming out along the spin axis

use crate::config::JetConfig;
use crate::instance::ParticleBuffers;
use crate::quality::QualityTier;
use crate::system::{ParticleSystem, ParticleTick};
use horizon_core::{clamp01, clamp_dt, RandomSource, Vec3};

pub struct AxialJets {
    config: JetConfig,
    quality: QualityTier,
    resamples: u64,
    axis: Vec3,
    basis: (Vec3, Vec3),

    lateral_x: Vec<f32>,
    lateral_y: Vec<f32>,
    axial: Vec<f32>,
    speed: Vec<f32>,
    direction_sign: Vec<f32>,

    buffers: ParticleBuffers,
}

/// Two unit vectors spanning the plane perpendicular to `axis`.
fn perpendicular_basis(axis: Vec3) -> (Vec3, Vec3) {
    let helper = if axis.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::UP
    };
    let u = axis.cross(&helper).normalized();
    let v = axis.cross(&u).normalized();
    (u, v)
}

fn unit_axis(config: &JetConfig) -> Vec3 {
    let axis = Vec3::from_array(config.axis).normalized();
    if axis == Vec3::ZERO {
        Vec3::UP
    } else {
        axis
    }
}

impl AxialJets {
    pub fn new(config: JetConfig, rng: &mut dyn RandomSource) -> Self {
        let axis = unit_axis(&config);
        let mut jets = Self {
            config,
            quality: QualityTier::High,
            resamples: 0,
            axis,
            basis: perpendicular_basis(axis),
            lateral_x: Vec::new(),
            lateral_y: Vec::new(),
            axial: Vec::new(),
            speed: Vec::new(),
            direction_sign: Vec::new(),
            buffers: ParticleBuffers::default(),
        };
        jets.initialize(config.capacity, config, rng);
        jets
    }

    pub fn axial_distances(&self) -> &[f32] {
        &self.axial
    }

    pub fn direction_signs(&self) -> &[f32] {
        &self.direction_sign
    }

    /// Current lateral distance of particle `i` from the jet axis
    pub fn lateral_spread(&self, i: usize) -> f32 {
        let offset = (self.lateral_x[i].powi(2) + self.lateral_y[i].powi(2)).sqrt();
        offset * (self.config.base_spread + self.config.spread_rate * self.axial[i])
    }

    /// Axial direction particle `i` is drawn along. While the attractor is
    /// active the direction never has a component toward the viewer.
    pub fn effective_direction(&self, i: usize, active: bool) -> Vec3 {
        let mut sign = self.direction_sign[i];
        if active && self.axis.dot(&Vec3::TOWARD_VIEWER) * sign > 0.0 {
            sign = -sign;
        }
        self.axis * sign
    }

    fn resample(&mut self, i: usize, rng: &mut dyn RandomSource) {
        // Uniform point in the unit disk
        let r = rng.next_f32().sqrt();
        let a = rng.range(0.0, std::f32::consts::TAU);
        self.lateral_x[i] = r * a.cos();
        self.lateral_y[i] = r * a.sin();
        self.axial[i] = 0.0;
        self.speed[i] = rng.range(self.config.speed_min, self.config.speed_max);
        self.direction_sign[i] = rng.sign();
    }

    fn write_outputs(&mut self, tick: &ParticleTick) {
        let c = self.config;
        let (u, v) = self.basis;
        let stress_boost = 1.0 + c.stress_gain * clamp01(tick.stress_hint);
        let pull_boost = c.pull_floor + (1.0 - c.pull_floor) * clamp01(tick.pull_intensity);
        for i in 0..self.axial.len() {
            let spread = c.base_spread + c.spread_rate * self.axial[i];
            let lateral = (u * self.lateral_x[i] + v * self.lateral_y[i]) * spread;
            let along = self.effective_direction(i, tick.active) * self.axial[i];

            let wave = 0.5 + 0.5 * (tick.time * c.pulse_speed + self.axial[i] * 0.35).sin();
            let pulse = c.pulse_floor + (1.0 - c.pulse_floor) * wave;
            let fade = 1.0 - self.axial[i] / c.length;
            let alpha = clamp01(pulse * stress_boost * pull_boost * fade);

            self.buffers
                .write(i, tick.center + along + lateral, c.color, c.size, alpha);
        }
    }
}

impl ParticleSystem for AxialJets {
    type Config = JetConfig;

    fn name(&self) -> &'static str {
        "jets"
    }

    fn config(&self) -> &JetConfig {
        &self.config
    }

    fn initialize(&mut self, capacity: usize, config: JetConfig, rng: &mut dyn RandomSource) {
        self.config = config;
        self.axis = unit_axis(&config);
        self.basis = perpendicular_basis(self.axis);
        self.resamples = 0;
        self.lateral_x = vec![0.0; capacity];
        self.lateral_y = vec![0.0; capacity];
        self.axial = vec![0.0; capacity];
        self.speed = vec![0.0; capacity];
        self.direction_sign = vec![1.0; capacity];
        self.buffers.resize(capacity);

        for i in 0..capacity {
            self.resample(i, rng);
            // Start the stream already filled
            self.axial[i] = rng.range(0.0, config.length);
        }
        self.write_outputs(&ParticleTick::default());
    }

    fn update(&mut self, tick: &ParticleTick, rng: &mut dyn RandomSource) {
        let dt = clamp_dt(tick.dt);
        for i in 0..self.axial.len() {
            let next = self.axial[i] + self.speed[i] * dt;
            if next > self.config.length {
                self.resample(i, rng);
                self.resamples += 1;
            } else {
                self.axial[i] = next;
            }
        }
        self.write_outputs(tick);
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
        log::info!("[particles] jets resized to {}", self.len());
        true
    }

    fn len(&self) -> usize {
        self.axial.len()
    }

    fn resample_count(&self) -> u64 {
        self.resamples
    }

    fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }
}
