//! Run command: drive the simulation headlessly and print aggregate stats

use super::load_config;
use anyhow::Result;
use horizon_core::Vec3;
use horizon_runtime::{SimEvent, Simulation, TickInput, TickReport};

pub struct RunArgs {
    pub config: Option<String>,
    pub ticks: u64,
    pub dt: f32,
    pub pull: f32,
    pub ramp: f32,
    pub disabled: bool,
    pub quality: i32,
    pub attractor: [f32; 3],
    pub every: u64,
    pub format: String,
}

pub fn run(args: RunArgs) -> Result<()> {
    let json = match args.format.as_str() {
        "json" => true,
        "text" => false,
        other => anyhow::bail!("Unknown format: {}", other),
    };

    let config = load_config(args.config.as_deref())?;
    let mut sim = Simulation::new(config)?;
    log::info!(
        "[run] {} vertices, {} nodes, {} particles, {} ticks",
        sim.shell().vertex_count(),
        sim.swarm().len(),
        sim.particle_count(),
        args.ticks
    );
    let mut input = TickInput {
        attractor_position: Vec3::from_array(args.attractor),
        enabled: !args.disabled,
        quality_tier: args.quality,
        ..TickInput::idle(args.dt)
    };

    let every = args.every.max(1);
    let mut last: Option<TickReport> = None;
    let mut recoveries = 0usize;

    for _ in 0..args.ticks {
        input.pull_intensity = ramped_pull(args.pull, args.ramp, sim.clock().total_time as f32);
        let report = sim.tick(&input);

        for event in sim.drain_events() {
            if matches!(event, SimEvent::Recovered { .. }) {
                recoveries += 1;
            }
            print_event(&event, json)?;
        }
        if report.tick % every == 0 {
            print_report(&report, json)?;
        }
        last = Some(report);
    }

    if let Some(report) = last {
        if report.tick % every != 0 {
            print_report(&report, json)?;
        }
        if !json {
            println!(
                "done: {} ticks, {:.2}s simulated, {} recoveries",
                report.tick, report.time, recoveries
            );
        }
    }
    Ok(())
}

/// Linear ease from 0 to `target` over `ramp` seconds.
fn ramped_pull(target: f32, ramp: f32, time: f32) -> f32 {
    if ramp <= 0.0 {
        target
    } else {
        target * (time / ramp).min(1.0)
    }
}

fn print_report(report: &TickReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!(
            "tick {:>6}  t={:>7.2}s  stress={:.4}  radius={:.3}  absorb={:.3}/{:.3}  nodes={:.3}  particles={}  resamples={}",
            report.tick,
            report.time,
            report.mean_stress,
            report.mean_radius,
            report.mean_absorption,
            report.max_absorption,
            report.node_absorption,
            report.particles,
            report.resamples
        );
    }
    Ok(())
}

fn print_event(event: &SimEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        match event {
            SimEvent::Recovered {
                component,
                tick,
                reason,
            } => println!("  ! tick {}: {} reset ({})", tick, component, reason),
            SimEvent::QualityChanged { tier, particles } => {
                println!("  quality {:?}: {} particles", tier, particles)
            }
            SimEvent::Grabbed { actor, vertex } => {
                println!("  actor {} grabbed vertex {}", actor, vertex)
            }
            SimEvent::Released { actor, vertex } => {
                println!("  actor {} released vertex {}", actor, vertex)
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target() {
        assert_eq!(ramped_pull(0.8, 0.0, 0.0), 0.8);
        assert!((ramped_pull(1.0, 2.0, 1.0) - 0.5).abs() < 1e-6);
        assert_eq!(ramped_pull(1.0, 2.0, 5.0), 1.0);
    }
}
