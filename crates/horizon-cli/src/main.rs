//! Horizon CLI - headless driver for the Horizon simulation core

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bench, config, run};

#[derive(Parser)]
#[command(name = "horizon")]
#[command(about = "Headless driver for the Horizon attractor/shell simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation and print periodic aggregate stats
    Run {
        /// Simulation config (TOML); defaults are used when omitted
        #[arg(long)]
        config: Option<String>,

        /// Number of ticks to run
        #[arg(long, default_value = "600")]
        ticks: u64,

        /// Per-tick step in seconds (clamped to [0.008, 0.033])
        #[arg(long, default_value = "0.0166667")]
        dt: f32,

        /// Target pull intensity in [0, 1]
        #[arg(long, default_value = "1.0")]
        pull: f32,

        /// Seconds to ease the pull intensity in from zero
        #[arg(long, default_value = "0.0")]
        ramp: f32,

        /// Keep the attractor switched off
        #[arg(long)]
        disabled: bool,

        /// Quality tier: 0 = high, 1 = medium, 2 = low
        #[arg(long, default_value = "0")]
        quality: i32,

        /// Attractor world position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        attractor: [f32; 3],

        /// Print stats every N ticks
        #[arg(long, default_value = "60")]
        every: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file to validate and print; defaults when omitted
        #[arg(long)]
        config: Option<String>,
    },

    /// Measure mean tick time with the attractor pulling at full strength
    Bench {
        #[arg(long)]
        config: Option<String>,

        #[arg(long, default_value = "1000")]
        ticks: u64,

        /// Quality tier: 0 = high, 1 = medium, 2 = low
        #[arg(long, default_value = "0")]
        quality: i32,
    },
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            dt,
            pull,
            ramp,
            disabled,
            quality,
            attractor,
            every,
            format,
        } => run::run(run::RunArgs {
            config,
            ticks,
            dt,
            pull,
            ramp,
            disabled,
            quality,
            attractor,
            every,
            format,
        }),
        Commands::Config { config } => config::run(config.as_deref()),
        Commands::Bench {
            config,
            ticks,
            quality,
        } => bench::run(config.as_deref(), ticks, quality),
    }
}
