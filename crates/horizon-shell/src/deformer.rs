//! Spring-mass shell solver

use crate::config::ShellConfig;
use crate::geometry::{centroid, mean_radius, ShellGeometry};
use crate::grab::{ActorId, ActorInput, GrabEvent, GrabTracker};
use crate::ramp::stress_color;
use horizon_core::{clamp01, clamp_dt, smoothstep, Frame, HorizonError, StepOutcome, Vec3};
use horizon_field::FieldSnapshot;
use std::collections::BTreeMap;

/// Node position (shell local) and activity, as seen by the shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeProbe {
    pub position: Vec3,
    pub activity: f32,
}

/// Inputs for one shell tick
pub struct ShellTick<'a> {
    pub dt: f32,
    /// Seconds since start, drives breathing
    pub time: f32,
    /// World-space attractor snapshot; localized with `frame` internally
    pub field: &'a FieldSnapshot,
    /// Placement of the shell's local space in the world
    pub frame: Frame,
    pub actors: &'a BTreeMap<ActorId, ActorInput>,
    pub nodes: &'a [NodeProbe],
}

/// Aggregates published after every tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShellStats {
    /// Mean live vertex position, shell local
    pub centroid: Vec3,
    /// Mean live distance from `centroid`
    pub mean_radius: f32,
    /// Moving average of per-vertex stress
    pub mean_stress: f32,
    pub mean_absorption: f32,
    pub max_absorption: f32,
}

/// Deformable shell. Buffers are parallel arrays indexed by vertex.
pub struct ShellDeformer {
    config: ShellConfig,
    rest: Vec<Vec3>,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    absorption: Vec<f32>,
    stress: Vec<f32>,
    colors: Vec<[f32; 3]>,
    /// Vertices captured earlier in this tick skip the remaining substeps
    captured: Vec<bool>,
    /// Absorption gained so far this tick, bounded by `absorb_frame_cap`
    absorbed: Vec<f32>,

    position_buffer: Vec<f32>,
    color_buffer: Vec<f32>,

    grabs: GrabTracker,
    events: Vec<GrabEvent>,
    rest_radius: f32,
    breathing_scale: f32,
    stats: ShellStats,
}

/// Anchor data frozen at the start of a substep
struct ActiveGrab {
    vertex: usize,
    actor: Vec3,
    displacement: Vec3,
}

impl ShellDeformer {
    pub fn new(geometry: &ShellGeometry, config: ShellConfig) -> Self {
        let n = geometry.vertex_count();
        let rest = geometry.positions.clone();
        let rest_radius = geometry.mean_radius();
        let mut shell = Self {
            config,
            positions: rest.clone(),
            rest,
            velocities: vec![Vec3::ZERO; n],
            absorption: vec![0.0; n],
            stress: vec![0.0; n],
            colors: vec![[0.0; 3]; n],
            captured: vec![false; n],
            absorbed: vec![0.0; n],
            position_buffer: vec![0.0; n * 3],
            color_buffer: vec![0.0; n * 3],
            grabs: GrabTracker::new(),
            events: Vec::new(),
            rest_radius,
            breathing_scale: 1.0,
            stats: ShellStats::default(),
        };
        shell.reset();
        log::debug!("[shell] {n} vertices, rest radius {rest_radius:.2}");
        shell
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn vertex_count(&self) -> usize {
        self.rest.len()
    }

    pub fn rest_radius(&self) -> f32 {
        self.rest_radius
    }

    /// Grab range around an actor
    pub fn touch_radius(&self) -> f32 {
        self.rest_radius * self.config.touch_radius_factor
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn absorption(&self) -> &[f32] {
        &self.absorption
    }

    pub fn stress(&self) -> &[f32] {
        &self.stress
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Flat xyz triples, shell local
    pub fn position_buffer(&self) -> &[f32] {
        &self.position_buffer
    }

    /// Flat rgb triples
    pub fn color_buffer(&self) -> &[f32] {
        &self.color_buffer
    }

    pub fn stats(&self) -> ShellStats {
        self.stats
    }

    pub fn grabs(&self) -> &GrabTracker {
        &self.grabs
    }

    /// Grab/release transitions from the most recent `update`. Each update
    /// discards whatever the caller left undrained.
    pub fn drain_events(&mut self) -> Vec<GrabEvent> {
        std::mem::take(&mut self.events)
    }

    /// Restore the rest shape without reallocating buffers
    pub fn reset(&mut self) {
        self.positions.copy_from_slice(&self.rest);
        self.velocities.fill(Vec3::ZERO);
        self.absorption.fill(0.0);
        self.stress.fill(0.0);
        self.captured.fill(false);
        self.breathing_scale = 1.0;
        self.stats.mean_stress = 0.0;
        self.refresh_outputs(0.0);
    }

    /// Advance the shell by one tick.
    pub fn update(&mut self, tick: &ShellTick) -> StepOutcome {
        let dt = clamp_dt(tick.dt);
        let field = tick.field.localized(&tick.frame);
        let active = field.is_active();
        let pull = if active { field.pull_intensity } else { 0.0 };
        let cfg = self.config;

        let touch_radius = self.touch_radius();
        self.events.clear();
        self.grabs.sync(
            tick.actors,
            &tick.frame,
            &self.positions,
            touch_radius,
            &mut self.events,
        );
        for event in &self.events {
            log::debug!("[shell] {event:?}");
        }

        let breath_weight = if active {
            1.0 - clamp01(pull / cfg.breathing_suppress_pull.max(1e-4))
        } else {
            1.0
        };
        self.breathing_scale =
            1.0 + cfg.breathing_amplitude * (tick.time * cfg.breathing_speed).sin() * breath_weight;
        let breath = self.breathing_scale;

        let pushers: Vec<Vec3> = tick
            .actors
            .iter()
            .filter(|(id, a)| !a.pinch && self.grabs.anchor(**id).is_none())
            .map(|(_, a)| tick.frame.to_local(a.position))
            .collect();

        let substeps = cfg.substeps.max(1);
        let sub_dt = dt / substeps as f32;
        let step = sub_dt * 60.0;
        self.captured.fill(false);
        self.absorbed.fill(0.0);
        let frame_cap = field.config.absorb_frame_cap;

        for _ in 0..substeps {
            let grabs: Vec<ActiveGrab> = self
                .grabs
                .anchors()
                .filter_map(|(id, anchor)| {
                    let actor = tick.actors.get(id)?;
                    let v = anchor.vertex;
                    Some(ActiveGrab {
                        vertex: v,
                        actor: tick.frame.to_local(actor.position),
                        displacement: self.positions[v] - self.rest[v] * breath,
                    })
                })
                .collect();

            for i in 0..self.rest.len() {
                if self.captured[i] {
                    continue;
                }
                let mut p = self.positions[i];
                let mut v = self.velocities[i];
                let target = self.rest[i] * breath;

                // Spring toward the breathing rest shape
                let spring_scale = ((1.0 - cfg.spring_pull_relief * pull)
                    * (1.0 - cfg.spring_absorb_relief * self.absorption[i]))
                    .max(cfg.min_spring_scale);
                let mut force = (target - p) * (cfg.stiffness * spring_scale);

                // Node repulsion
                for node in tick.nodes {
                    let d = p - node.position;
                    let dist = d.length();
                    if dist < cfg.node_touch_radius && dist > 1e-5 {
                        let strength = cfg.node_repulsion + node.activity * cfg.node_activity_gain;
                        force += d / dist * ((1.0 - dist / cfg.node_touch_radius) * strength);
                    }
                }

                // Grab: the anchor chases the actor, neighbours follow the anchor
                for grab in &grabs {
                    if grab.vertex == i {
                        force += ((grab.actor - p) * cfg.grab_stiffness)
                            .clamp_length(cfg.grip_strength);
                    } else {
                        let rest_dist = self.rest[i].distance(&self.rest[grab.vertex]);
                        if rest_dist < cfg.grab_falloff_radius {
                            let w = (1.0 - rest_dist / cfg.grab_falloff_radius)
                                .powf(cfg.grab_falloff_exponent);
                            let desired = target + grab.displacement * w;
                            force += (desired - p) * (cfg.follow_gain * w);
                        }
                    }
                }

                // Push from open hands
                for actor in &pushers {
                    let d = p - *actor;
                    let dist = d.length();
                    if dist < cfg.push_range && dist > 1e-5 {
                        force += d / dist
                            * (cfg.push_strength * smoothstep(1.0 - dist / cfg.push_range));
                    }
                }

                v += force * step;

                // Attractor
                if let Some(effect) = field.compute_effect(p, v, sub_dt, self.absorption[i]) {
                    v += effect.accel * (sub_dt * pull);

                    let funnel = effect.attractor
                        - Vec3::TOWARD_VIEWER * (field.config.tunnel_depth * self.absorption[i]);
                    p += (funnel - p).normalized()
                        * (field.config.suction_speed * sub_dt * pull * effect.influence);

                    v *= effect.drag_multiplier;
                    v = effect.apply_tidal(v, &field.config, step);

                    if effect.absorb_delta > 0.0 {
                        let gain = effect.absorb_delta.min(frame_cap - self.absorbed[i]).max(0.0);
                        self.absorbed[i] += gain;
                        self.absorption[i] = clamp01(self.absorption[i] + gain);
                    } else {
                        self.absorption[i] =
                            clamp01(self.absorption[i] - field.config.absorb_decay * sub_dt);
                    }

                    if effect.captured {
                        self.positions[i] = effect.attractor;
                        self.velocities[i] = Vec3::ZERO;
                        self.captured[i] = true;
                        continue;
                    }
                }

                v *= cfg.damping;
                p += v * step;
                self.positions[i] = p;
                self.velocities[i] = v;
            }
        }

        if !active {
            let decay = field.config.absorb_decay * dt;
            for a in &mut self.absorption {
                *a = clamp01(*a - decay);
            }
        }

        if let Err(err) = self.scan_finite() {
            log::warn!("[shell] {err}; resetting to rest shape");
            self.reset();
            return StepOutcome::Recovered(err);
        }

        self.refresh_outputs(1.0 - cfg.stress_decay);
        StepOutcome::Stable
    }

    fn scan_finite(&self) -> Result<(), HorizonError> {
        let bad = self
            .positions
            .iter()
            .zip(&self.velocities)
            .position(|(p, v)| !p.is_finite() || !v.is_finite());
        match bad {
            Some(index) => Err(HorizonError::NonFinite {
                component: "shell",
                index,
            }),
            None => Ok(()),
        }
    }

    /// Recompute stress, colors, flat buffers and aggregates.
    /// `blend` is the weight of this tick in the mean stress average.
    fn refresh_outputs(&mut self, blend: f32) {
        let cfg = &self.config;
        let breath = self.breathing_scale;
        let mut stress_sum = 0.0;
        for i in 0..self.rest.len() {
            let s = self.positions[i].distance(&(self.rest[i] * breath));
            self.stress[i] = s;
            stress_sum += s;
            let c = stress_color(s, cfg.stress_scale, self.absorption[i], cfg.absorb_darken);
            self.colors[i] = c;
            self.position_buffer[i * 3..i * 3 + 3].copy_from_slice(&self.positions[i].to_array());
            self.color_buffer[i * 3..i * 3 + 3].copy_from_slice(&c);
        }

        let n = self.rest.len().max(1) as f32;
        let center = centroid(&self.positions);
        self.stats = ShellStats {
            centroid: center,
            mean_radius: mean_radius(&self.positions, center),
            mean_stress: self.stats.mean_stress * (1.0 - blend) + (stress_sum / n) * blend,
            mean_absorption: self.absorption.iter().sum::<f32>() / n,
            max_absorption: self.absorption.iter().cloned().fold(0.0, f32::max),
        };
    }
}
