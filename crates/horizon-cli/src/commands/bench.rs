//! Bench command: time the full tick under a pulling attractor

use super::load_config;
use anyhow::Result;
use horizon_core::Vec3;
use horizon_runtime::{Simulation, TickInput};
use std::time::Instant;

pub fn run(config_path: Option<&str>, ticks: u64, quality: i32) -> Result<()> {
    let config = load_config(config_path)?;
    let mut sim = Simulation::new(config)?;
    let input = TickInput {
        attractor_position: Vec3::ZERO,
        enabled: true,
        pull_intensity: 1.0,
        quality_tier: quality,
        ..TickInput::idle(1.0 / 60.0)
    };

    // Warm up, and let any quality change reallocate outside the timed loop
    for _ in 0..10 {
        sim.tick(&input);
    }

    let start = Instant::now();
    for _ in 0..ticks {
        sim.tick(&input);
    }
    let elapsed = start.elapsed().as_secs_f64();
    let per_tick = elapsed / ticks.max(1) as f64;

    println!(
        "{} ticks, {} vertices, {} nodes, {} particles",
        ticks,
        sim.shell().vertex_count(),
        sim.swarm().len(),
        sim.particle_count()
    );
    println!(
        "mean tick {:.1} us ({:.0} ticks/s)",
        per_tick * 1e6,
        if per_tick > 0.0 { 1.0 / per_tick } else { 0.0 }
    );
    Ok(())
}
