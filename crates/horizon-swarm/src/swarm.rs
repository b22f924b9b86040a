//! Node swarm state and per-tick update

use crate::config::SwarmConfig;
use horizon_core::{
    clamp01, clamp_dt, lerp_color, Frame, HorizonError, RandomSource, StepOutcome, Vec3,
};
use horizon_field::FieldSnapshot;

/// Inputs for one swarm tick
pub struct SwarmTick<'a> {
    pub dt: f32,
    /// World-space attractor snapshot; localized with `frame` internally
    pub field: &'a FieldSnapshot,
    /// Placement of the shell's local space in the world
    pub frame: Frame,
    /// Live shell centroid, shell local
    pub shell_center: Vec3,
    /// Live shell mean radius
    pub shell_radius: f32,
}

pub struct NodeSwarm {
    config: SwarmConfig,
    origins: Vec<Vec3>,
    unit_dirs: Vec<Vec3>,
    base: Vec<Vec3>,
    drift: Vec<Vec3>,
    phase: Vec<f32>,
    activity: Vec<f32>,
    absorption: Vec<f32>,
    /// Last finite shell center, reused when outputs refresh outside `update`
    center: Vec3,

    positions: Vec<Vec3>,
    scales: Vec<f32>,
    opacity: Vec<f32>,
    colors: Vec<[f32; 3]>,
    position_buffer: Vec<f32>,
    color_buffer: Vec<f32>,
}

impl NodeSwarm {
    /// Build a swarm whose rest positions are `origins` (relative to the shell center).
    pub fn new(origins: Vec<Vec3>, config: SwarmConfig, rng: &mut dyn RandomSource) -> Self {
        let n = origins.len();
        let unit_dirs = origins
            .iter()
            .map(|o| {
                let d = o.normalized();
                if d == Vec3::ZERO {
                    Vec3::UP
                } else {
                    d
                }
            })
            .collect();
        let phase = (0..n)
            .map(|_| rng.range(0.0, std::f32::consts::TAU))
            .collect();
        let mut swarm = Self {
            config,
            base: origins.clone(),
            origins,
            unit_dirs,
            drift: vec![Vec3::ZERO; n],
            phase,
            activity: vec![0.0; n],
            absorption: vec![0.0; n],
            center: Vec3::ZERO,
            positions: vec![Vec3::ZERO; n],
            scales: vec![0.0; n],
            opacity: vec![0.0; n],
            colors: vec![[0.0; 3]; n],
            position_buffer: vec![0.0; n * 3],
            color_buffer: vec![0.0; n * 3],
        };
        swarm.reset(rng);
        swarm
    }

    /// `count` nodes scattered uniformly through a ball of `radius`.
    pub fn scattered(
        count: usize,
        radius: f32,
        config: SwarmConfig,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let origins = (0..count)
            .map(|_| rng.random_direction() * (radius * rng.next_f32().cbrt()))
            .collect();
        Self::new(origins, config, rng)
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Positions relative to the shell center
    pub fn base_positions(&self) -> &[Vec3] {
        &self.base
    }

    pub fn drift_velocities(&self) -> &[Vec3] {
        &self.drift
    }

    /// Positions in shell local space, as of the last update
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn activity(&self) -> &[f32] {
        &self.activity
    }

    pub fn absorption(&self) -> &[f32] {
        &self.absorption
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn opacity(&self) -> &[f32] {
        &self.opacity
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn position_buffer(&self) -> &[f32] {
        &self.position_buffer
    }

    pub fn color_buffer(&self) -> &[f32] {
        &self.color_buffer
    }

    /// Set one node's externally driven activity, clamped to [0, 1]
    pub fn set_activity(&mut self, index: usize, value: f32) {
        if let Some(a) = self.activity.get_mut(index) {
            *a = clamp01(value);
        }
    }

    pub fn set_all_activity(&mut self, value: f32) {
        self.activity.fill(clamp01(value));
    }

    pub fn mean_absorption(&self) -> f32 {
        if self.absorption.is_empty() {
            return 0.0;
        }
        self.absorption.iter().sum::<f32>() / self.absorption.len() as f32
    }

    /// Restore original positions, clear absorption and reseed drift
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.base.copy_from_slice(&self.origins);
        self.absorption.fill(0.0);
        for d in &mut self.drift {
            *d = rng.random_direction() * self.config.drift_speed;
        }
        self.refresh_outputs(self.center);
    }

    pub fn update(&mut self, tick: &SwarmTick, rng: &mut dyn RandomSource) -> StepOutcome {
        let dt = clamp_dt(tick.dt);
        let step = dt * 60.0;
        let cfg = self.config;
        if tick.shell_center.is_finite() {
            self.center = tick.shell_center;
        }
        let field = tick.field.localized(&tick.frame);
        let pull = field.pull_intensity;
        let engaged = field.is_active() && pull > cfg.activation_pull;
        let band = field.config.horizon_radius * cfg.absorb_band;

        let max_r = tick.shell_radius * cfg.containment_factor;
        let min_r = cfg.min_radius.min(max_r);

        for i in 0..self.base.len() {
            let mut base = self.base[i] + self.drift[i] * step;

            if engaged {
                let local = tick.shell_center + base;
                if let Some(effect) =
                    field.compute_effect(local, self.drift[i], dt, self.absorption[i])
                {
                    if effect.influence > 0.0 {
                        let weight = pull * effect.influence * dt;
                        base += effect.direction
                            * (field.config.suction_speed * cfg.suction * weight);
                        let swirl = Vec3::UP.cross(&effect.direction).normalized();
                        base += swirl * (cfg.swirl_speed * weight);
                        if effect.distance < band {
                            self.absorption[i] =
                                clamp01(self.absorption[i] + cfg.absorb_rate * dt);
                        }
                    }
                }
            } else {
                self.absorption[i] = clamp01(self.absorption[i] - cfg.relax_rate * dt);
            }

            if self.absorption[i] > 0.0 {
                let shrink = field.config.shrink_rate * self.absorption[i] * dt;
                base *= (1.0 - shrink).max(0.0);
            }

            let dist = base.length();
            if dist > max_r {
                let normal = base / dist;
                base = normal * max_r;
                self.drift[i] = bounce(self.drift[i], normal, cfg.restitution, cfg.jitter, rng);
            } else if dist < min_r {
                let normal = if dist > 1e-6 {
                    base / dist
                } else {
                    self.unit_dirs[i]
                };
                base = normal * min_r;
                self.drift[i] = bounce(self.drift[i], -normal, cfg.restitution, cfg.jitter, rng);
            }

            self.base[i] = base;
            self.phase[i] = (self.phase[i] + cfg.pulse_speed * dt) % std::f32::consts::TAU;
        }

        if let Err(err) = self.scan_finite() {
            log::warn!("[swarm] {err}; resetting nodes");
            self.reset(rng);
            return StepOutcome::Recovered(err);
        }

        self.refresh_outputs(self.center);
        StepOutcome::Stable
    }

    fn scan_finite(&self) -> Result<(), HorizonError> {
        let bad = self
            .base
            .iter()
            .zip(&self.drift)
            .position(|(p, v)| !p.is_finite() || !v.is_finite());
        match bad {
            Some(index) => Err(HorizonError::NonFinite {
                component: "swarm",
                index,
            }),
            None => Ok(()),
        }
    }

    fn refresh_outputs(&mut self, center: Vec3) {
        let cfg = &self.config;
        for i in 0..self.base.len() {
            let a = self.absorption[i];
            let pulse = 0.5 + 0.5 * self.phase[i].sin();
            let p = center + self.base[i];
            self.positions[i] = p;
            self.scales[i] =
                cfg.base_scale * (1.0 - a) * (1.0 + self.activity[i] * cfg.pulse_gain * pulse);
            self.opacity[i] = 1.0 - a;
            let c = lerp_color(cfg.base_color, cfg.absorbed_color, a);
            self.colors[i] = c;
            self.position_buffer[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
            self.color_buffer[i * 3..i * 3 + 3].copy_from_slice(&c);
        }
    }
}

/// Reflect the component of `v` that points along `normal`, keep
/// `restitution` of it, and add a small random kick.
fn bounce(
    v: Vec3,
    normal: Vec3,
    restitution: f32,
    jitter: f32,
    rng: &mut dyn RandomSource,
) -> Vec3 {
    let vn = v.dot(&normal);
    let reflected = if vn > 0.0 {
        v - normal * (vn * (1.0 + restitution))
    } else {
        v
    };
    reflected + rng.random_direction() * jitter
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::ParticleRng;
    use horizon_field::{AttractorConfig, GravityField};

    const DT: f32 = 1.0 / 60.0;

    fn idle_field() -> FieldSnapshot {
        GravityField::new(AttractorConfig::default()).snapshot()
    }

    fn pulling_field(at: Vec3) -> FieldSnapshot {
        let mut field = GravityField::new(AttractorConfig::default());
        field.set_position(at);
        field.set_enabled(true);
        field.set_pull_intensity(1.0);
        field.snapshot()
    }

    fn tick(field: &FieldSnapshot, radius: f32) -> SwarmTick<'_> {
        SwarmTick {
            dt: DT,
            field,
            frame: Frame::IDENTITY,
            shell_center: Vec3::ZERO,
            shell_radius: radius,
        }
    }

    #[test]
    fn nodes_stay_inside_live_radius() {
        let mut rng = ParticleRng::new(11);
        let config = SwarmConfig {
            drift_speed: 0.3,
            ..Default::default()
        };
        let mut swarm = NodeSwarm::scattered(24, 6.0, config, &mut rng);
        let field = idle_field();
        for t in 0..600 {
            // Shell radius oscillates the way a deforming shell would
            let radius = 8.0 + 2.0 * (t as f32 * 0.05).sin();
            let outcome = swarm.update(&tick(&field, radius), &mut rng);
            assert!(outcome.is_stable());
            let max_r = radius * swarm.config().containment_factor;
            for p in swarm.base_positions() {
                assert!(p.length() <= max_r + 1e-4);
                assert!(p.length() >= swarm.config().min_radius - 1e-4);
            }
        }
    }

    #[test]
    fn bounce_reverses_outward_motion() {
        let mut rng = ParticleRng::new(3);
        let v = bounce(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.5, 0.0, &mut rng);
        assert!((v.x + 0.5).abs() < 1e-6);

        let inward = bounce(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.5, 0.0, &mut rng);
        assert_eq!(inward, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn node_at_center_is_pushed_out_along_its_direction() {
        let mut rng = ParticleRng::new(5);
        let config = SwarmConfig {
            drift_speed: 0.0,
            jitter: 0.0,
            ..Default::default()
        };
        let mut swarm = NodeSwarm::new(vec![Vec3::ZERO], config, &mut rng);
        swarm.update(&tick(&idle_field(), 8.0), &mut rng);
        assert!((swarm.base_positions()[0].length() - config.min_radius).abs() < 1e-5);
    }

    #[test]
    fn attractor_absorbs_and_shrinks_nodes() {
        let mut rng = ParticleRng::new(9);
        let config = SwarmConfig {
            drift_speed: 0.0,
            jitter: 0.0,
            ..Default::default()
        };
        let origin = Vec3::new(4.0, 0.0, 0.0);
        let mut swarm = NodeSwarm::new(vec![origin], config, &mut rng);
        let field = pulling_field(Vec3::new(3.0, 0.0, 0.0));
        for _ in 0..120 {
            swarm.update(&tick(&field, 8.0), &mut rng);
        }
        let a = swarm.absorption()[0];
        assert!(a > 0.5);
        assert!(swarm.opacity()[0] < 0.5);
        assert!(swarm.scales()[0] < config.base_scale * 0.5);
        // Hue moves toward the absorbed color
        assert!(swarm.colors()[0][1] < config.base_color[1]);
    }

    #[test]
    fn absorption_relaxes_when_inactive() {
        let mut rng = ParticleRng::new(9);
        let mut swarm = NodeSwarm::new(vec![Vec3::new(2.0, 0.0, 0.0)], SwarmConfig::default(), &mut rng);
        swarm.absorption[0] = 0.5;
        swarm.update(&tick(&idle_field(), 8.0), &mut rng);
        assert!(swarm.absorption()[0] < 0.5);
    }

    #[test]
    fn suction_moves_nodes_toward_attractor() {
        let mut rng = ParticleRng::new(2);
        let config = SwarmConfig {
            drift_speed: 0.0,
            jitter: 0.0,
            ..Default::default()
        };
        let start = Vec3::new(-3.0, 0.0, 0.0);
        let attractor = Vec3::new(5.0, 0.0, 0.0);
        let mut swarm = NodeSwarm::new(vec![start], config, &mut rng);
        let field = pulling_field(attractor);
        for _ in 0..30 {
            swarm.update(&tick(&field, 8.0), &mut rng);
        }
        let after = swarm.base_positions()[0].distance(&attractor);
        assert!(after < start.distance(&attractor));
    }

    #[test]
    fn non_finite_node_triggers_reset() {
        let mut rng = ParticleRng::new(1);
        let origins = vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 0.0, 1.0)];
        let mut swarm = NodeSwarm::new(origins.clone(), SwarmConfig::default(), &mut rng);
        swarm.base[1] = Vec3::new(f32::NAN, 0.0, 0.0);
        let outcome = swarm.update(&tick(&idle_field(), 8.0), &mut rng);
        assert!(matches!(
            outcome,
            StepOutcome::Recovered(HorizonError::NonFinite { component: "swarm", index: 1 })
        ));
        assert_eq!(swarm.base_positions(), origins.as_slice());
        assert!(swarm.absorption().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn recovery_keeps_outputs_around_last_shell_center() {
        let mut rng = ParticleRng::new(1);
        let origins = vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 0.0, 1.0)];
        let mut swarm = NodeSwarm::new(origins.clone(), SwarmConfig::default(), &mut rng);
        let field = idle_field();
        let center = Vec3::new(5.0, -1.0, 2.0);
        let moved = SwarmTick {
            shell_center: center,
            ..tick(&field, 8.0)
        };
        assert!(swarm.update(&moved, &mut rng).is_stable());

        swarm.base[0] = Vec3::new(0.0, f32::NAN, 0.0);
        assert!(!swarm.update(&moved, &mut rng).is_stable());
        for (p, o) in swarm.positions().iter().zip(&origins) {
            assert!(p.distance(&(center + *o)) < 1e-5);
        }

        swarm.reset(&mut rng);
        assert!(swarm.positions()[1].distance(&(center + origins[1])) < 1e-5);
    }

    #[test]
    fn reset_reseeds_drift() {
        let mut rng = ParticleRng::new(4);
        let mut swarm = NodeSwarm::scattered(8, 5.0, SwarmConfig::default(), &mut rng);
        let before = swarm.drift_velocities().to_vec();
        swarm.reset(&mut rng);
        assert_ne!(before, swarm.drift_velocities());
        for d in swarm.drift_velocities() {
            assert!((d.length() - swarm.config().drift_speed).abs() < 1e-4);
        }
    }

    #[test]
    fn activity_is_clamped_and_pulses_scale() {
        let mut rng = ParticleRng::new(4);
        let mut swarm = NodeSwarm::new(vec![Vec3::new(2.0, 0.0, 0.0)], SwarmConfig::default(), &mut rng);
        swarm.set_activity(0, 4.0);
        swarm.set_activity(7, 1.0);
        assert_eq!(swarm.activity()[0], 1.0);
        swarm.update(&tick(&idle_field(), 8.0), &mut rng);
        assert!(swarm.scales()[0] >= swarm.config().base_scale);
    }
}
