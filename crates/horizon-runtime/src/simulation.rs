//! The fixed-order frame loop

use crate::clock::FrameClock;
use crate::config::SimConfig;
use crate::event::SimEvent;
use crate::event_bus::EventBus;
use horizon_core::{Frame, ParticleRng, Result, StepOutcome, Vec3};
use horizon_field::GravityField;
use horizon_particles::{
    AccretionDisk, AxialJets, ParticleInstance, ParticleSystem, ParticleTick, PhotonRing,
    QualityTier,
};
use horizon_shell::{ActorId, ActorInput, GrabEvent, NodeProbe, ShellDeformer, ShellGeometry, ShellTick};
use horizon_swarm::{NodeSwarm, SwarmTick};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the collaborator layer supplies for one tick. Positions are
/// in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct TickInput {
    pub dt: f32,
    pub actors: BTreeMap<ActorId, ActorInput>,
    pub attractor_position: Vec3,
    pub enabled: bool,
    pub pull_intensity: f32,
    /// 0 = high, 1 = medium, 2 = low; other values are clamped
    pub quality_tier: i32,
}

impl TickInput {
    /// No actors, attractor disabled at the world origin
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            actors: BTreeMap::new(),
            attractor_position: Vec3::ZERO,
            enabled: false,
            pull_intensity: 0.0,
            quality_tier: 0,
        }
    }
}

/// Aggregate scalars published after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub time: f64,
    /// Step actually used, after clamping
    pub dt: f32,
    pub mean_stress: f32,
    pub mean_radius: f32,
    pub mean_absorption: f32,
    pub max_absorption: f32,
    pub node_absorption: f32,
    pub quality: QualityTier,
    pub particles: usize,
    pub resamples: u64,
    pub shell_recovered: bool,
    pub swarm_recovered: bool,
}

pub struct Simulation {
    config: SimConfig,
    frame: Frame,
    clock: FrameClock,
    rng: ParticleRng,

    field: GravityField,
    shell: ShellDeformer,
    swarm: NodeSwarm,
    disk: AccretionDisk,
    jets: AxialJets,
    ring: PhotonRing,

    quality: QualityTier,
    probes: Vec<NodeProbe>,
    events: EventBus<SimEvent>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ParticleRng::new(config.seed);

        let geometry = ShellGeometry::icosphere(config.shell_radius, config.shell_subdivisions);
        let shell = ShellDeformer::new(&geometry, config.shell);
        let swarm = NodeSwarm::scattered(
            config.node_count,
            config.shell_radius * config.node_spread,
            config.swarm,
            &mut rng,
        );
        let disk = AccretionDisk::new(config.disk, &mut rng);
        let jets = AxialJets::new(config.jets, &mut rng);
        let ring = PhotonRing::new(config.ring, config.attractor.horizon_radius, &mut rng);

        log::info!(
            "[sim] {} vertices, {} nodes, {} particles",
            shell.vertex_count(),
            swarm.len(),
            disk.len() + jets.len() + ring.len()
        );

        Ok(Self {
            field: GravityField::new(config.attractor),
            frame: Frame::IDENTITY,
            clock: FrameClock::new(),
            rng,
            shell,
            swarm,
            disk,
            jets,
            ring,
            quality: QualityTier::High,
            probes: Vec::new(),
            events: EventBus::new(),
            config,
        })
    }

    /// Place the shell's local space in the world
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn field(&self) -> &GravityField {
        &self.field
    }

    pub fn shell(&self) -> &ShellDeformer {
        &self.shell
    }

    pub fn swarm(&self) -> &NodeSwarm {
        &self.swarm
    }

    /// Mutable swarm access for driving node activity
    pub fn swarm_mut(&mut self) -> &mut NodeSwarm {
        &mut self.swarm
    }

    pub fn disk(&self) -> &AccretionDisk {
        &self.disk
    }

    pub fn jets(&self) -> &AxialJets {
        &self.jets
    }

    pub fn ring(&self) -> &PhotonRing {
        &self.ring
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    pub fn particle_count(&self) -> usize {
        self.disk.len() + self.jets.len() + self.ring.len()
    }

    pub fn resample_count(&self) -> u64 {
        self.disk.resample_count() + self.jets.resample_count() + self.ring.resample_count()
    }

    pub fn events(&self) -> &EventBus<SimEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Instances for all three clouds, disk first
    pub fn pack_particles(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        self.disk.pack_instances(out);
        self.jets.pack_instances(out);
        self.ring.pack_instances(out);
    }

    /// Return the shell and swarm to rest. Particle pools keep running.
    pub fn reset(&mut self) {
        self.shell.reset();
        self.swarm.reset(&mut self.rng);
        self.probes.clear();
    }

    /// Run one tick: field snapshot, shell, swarm, then the particle clouds.
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let dt = self.clock.advance(input.dt);
        let time = self.clock.time();
        let tick = self.clock.ticks;

        self.apply_quality(QualityTier::from_index(input.quality_tier));

        self.field.set_position(input.attractor_position);
        self.field.set_enabled(input.enabled);
        self.field.set_pull_intensity(input.pull_intensity);
        let snapshot = self.field.snapshot();

        // Nodes as of the previous tick
        self.probes.clear();
        self.probes.extend(
            self.swarm
                .positions()
                .iter()
                .zip(self.swarm.activity())
                .map(|(&position, &activity)| NodeProbe { position, activity }),
        );

        let shell_outcome = self.shell.update(&ShellTick {
            dt,
            time,
            field: &snapshot,
            frame: self.frame,
            actors: &input.actors,
            nodes: &self.probes,
        });
        let shell_recovered = self.record("shell", tick, shell_outcome);

        for event in self.shell.drain_events() {
            self.events.push(match event {
                GrabEvent::Grabbed { actor, vertex } => SimEvent::Grabbed { actor, vertex },
                GrabEvent::Released { actor, vertex } => SimEvent::Released { actor, vertex },
            });
        }

        let stats = self.shell.stats();
        let swarm_outcome = self.swarm.update(
            &SwarmTick {
                dt,
                field: &snapshot,
                frame: self.frame,
                shell_center: stats.centroid,
                shell_radius: stats.mean_radius,
            },
            &mut self.rng,
        );
        let swarm_recovered = self.record("swarm", tick, swarm_outcome);

        // A switched-off attractor reads as zero pull, as it does for the shell
        let active = snapshot.is_active();
        let particle_tick = ParticleTick {
            dt,
            time,
            pull_intensity: if active { snapshot.pull_intensity } else { 0.0 },
            stress_hint: stats.mean_stress / self.shell.config().stress_scale,
            active,
            center: self.frame.to_local(snapshot.position),
        };
        self.disk.update(&particle_tick, &mut self.rng);
        self.jets.update(&particle_tick, &mut self.rng);
        self.ring.update(&particle_tick, &mut self.rng);

        TickReport {
            tick,
            time: self.clock.total_time,
            dt,
            mean_stress: stats.mean_stress,
            mean_radius: stats.mean_radius,
            mean_absorption: stats.mean_absorption,
            max_absorption: stats.max_absorption,
            node_absorption: self.swarm.mean_absorption(),
            quality: self.quality,
            particles: self.particle_count(),
            resamples: self.resample_count(),
            shell_recovered,
            swarm_recovered,
        }
    }

    fn apply_quality(&mut self, tier: QualityTier) {
        if tier == self.quality {
            return;
        }
        self.quality = tier;
        self.disk.set_quality(tier, &mut self.rng);
        self.jets.set_quality(tier, &mut self.rng);
        self.ring.set_quality(tier, &mut self.rng);
        let particles = self.particle_count();
        log::info!("[sim] quality {:?}, {} particles", tier, particles);
        self.events.push(SimEvent::QualityChanged { tier, particles });
    }

    /// Returns true when the component had to reset.
    fn record(&mut self, component: &'static str, tick: u64, outcome: StepOutcome) -> bool {
        match outcome {
            StepOutcome::Stable => false,
            StepOutcome::Recovered(err) => {
                log::warn!("[sim] tick {tick}: {component} recovered from {err}");
                self.events.push(SimEvent::Recovered {
                    component,
                    tick,
                    reason: err.to_string(),
                });
                true
            }
        }
    }
}
