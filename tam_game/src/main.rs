//! # TAM-PONG
//!
//! Physical Pong table controller.
//!
//! # Usage
//!
//! ```bash
//! # Play on the simulated table with the default config
//! tam_pong --config config/tam_pong.toml
//!
//! # Unattended: start at once and accept two rematches
//! tam_pong --auto 2 --seed 7 -v
//!
//! # JSON logs
//! tam_pong --json
//! ```

#![deny(warnings)]

use clap::Parser;
use std::path::PathBuf;
use tam_common::config::{ConfigLoader, LogLevel};
use tam_common::consts::DEFAULT_CONFIG_PATH;
use tam_game::config::ms;
use tam_game::operator::{ConsoleOperator, Operator, ScriptedOperator};
use tam_game::presentation::audio::TracingSpeaker;
use tam_game::presentation::display::{DisplayTiming, TracingCanvas};
use tam_game::presentation::exit::{ExitPolicy, ExitSignal};
use tam_game::startup::{Frontend, SessionOptions, run_session};
use tam_game::{GameConfig, GameError};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// TAM-PONG - Pong on a two-axis motor table
#[derive(Parser, Debug)]
#[command(name = "tam_pong")]
#[command(version)]
#[command(about = "Physical Pong table controller")]
#[command(long_about = None)]
struct Args {
    /// Path to the TOML configuration. Defaults apply when it is missing.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// HAL driver to load, overriding `hardware.driver`
    #[arg(short, long)]
    driver: Option<String>,

    /// Seed for kickoff angles
    #[arg(long)]
    seed: Option<u64>,

    /// Play unattended, accepting this many rematches
    #[arg(long, value_name = "REMATCHES")]
    auto: Option<u32>,

    /// Let the exit button stop the match instead of killing the process
    #[arg(long)]
    graceful_exit: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("TAM-PONG failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = GameConfig::load_or_default(&args.config);
    let log_level = loaded
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    let mut config = loaded?;
    if let Some(driver) = &args.driver {
        config.hardware.driver = driver.clone();
    }
    config.validate()?;

    info!("TAM-PONG v{} starting...", env!("CARGO_PKG_VERSION"));

    let signal = ExitSignal::new();
    {
        let signal = signal.clone();
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            signal.raise();
        })?;
    }

    let registry = tam_hal::builtin_registry();
    let mut driver = registry.create_driver(&config.hardware.driver)?;
    driver.init(&config.hardware)?;

    let operator: Box<dyn Operator> = match args.auto {
        Some(rematches) => Box::new(ScriptedOperator::new(rematches)),
        None => Box::new(ConsoleOperator::spawn(ms(config.timing.exit_poll_ms))?),
    };
    let frontend = Frontend {
        canvas: Box::new(TracingCanvas::new()),
        speaker: Box::new(TracingSpeaker::new()),
        operator,
        display_timing: DisplayTiming::default(),
    };
    let options = SessionOptions {
        exit_policy: if args.graceful_exit {
            ExitPolicy::Cooperative
        } else {
            ExitPolicy::Immediate
        },
        seed: args.seed,
    };

    let outcome = run_session(driver.as_mut(), &config, frontend, signal, options);
    driver.shutdown()?;

    match outcome {
        Ok(summary) => {
            for (n, game) in summary.games.iter().enumerate() {
                info!(
                    "Game {}: {} won {}:{}",
                    n + 1,
                    game.winner,
                    game.scores[0],
                    game.scores[1]
                );
            }
        }
        Err(GameError::ExitRequested) => info!("Exit requested"),
        Err(e) => return Err(e.into()),
    }

    info!("TAM-PONG shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
