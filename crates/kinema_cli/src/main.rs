//! Kinema CLI
//!
//! Run the showcase screens headless and log what they paint.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use config::KinemaConfig;
use kinema_screens::ScreenKind;
use simulate::RunOptions;

#[derive(Parser)]
#[command(name = "kinema")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kinema animation showcase CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./kinema.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a screen through its scripted interaction
    Run {
        /// Screen name (home, carousel, timer, drawer, gestures)
        screen: String,

        /// Pace frames against the wall clock
        #[arg(short, long)]
        realtime: bool,

        /// Stop after this many frames
        #[arg(long, default_value = "1800")]
        max_frames: u64,

        /// Hold the first paint back until assets have "loaded"
        #[arg(long, default_value = "0")]
        assets_delay_ms: u64,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the available screens
    List,

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = KinemaConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            screen,
            realtime,
            max_frames,
            assets_delay_ms,
            seed,
        } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let options = RunOptions {
                realtime,
                max_frames,
                assets_delay: Duration::from_millis(assets_delay_ms),
            };
            cmd_run(&screen, &config, &options)
        }
        Commands::List => cmd_list(),
        Commands::Config => cmd_config(&config),
    }
}

fn cmd_run(screen: &str, config: &KinemaConfig, options: &RunOptions) -> Result<()> {
    let kind = ScreenKind::from_name(screen)?;
    let report = simulate::run(kind, config, options)?;

    info!(
        "{} ran {} frames ({:.2}s), {} style updates",
        report.screen,
        report.stats.frames,
        report.stats.elapsed.as_secs_f32(),
        report.updates
    );
    if !report.settled {
        tracing::warn!("frame budget ran out before the screen settled");
    }
    for target in &report.navigations {
        info!("navigated to {}", target);
    }
    if !report.haptics.is_empty() {
        info!("haptics: {:?}", report.haptics);
    }

    info!("final frame:");
    for (node, style) in &report.nodes {
        info!("  {:<16} {}", node.to_string(), style);
    }
    Ok(())
}

fn cmd_list() -> Result<()> {
    println!("Screens:");
    for kind in ScreenKind::ALL {
        println!("  {:<10} {}", kind.id().name().to_lowercase(), kind.title());
    }
    Ok(())
}

fn cmd_config(config: &KinemaConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
