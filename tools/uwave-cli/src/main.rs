//! uwave CLI: command-line interface for replaying and inspecting gesture traces.
//!
//! Usage:
//!   uwave match --template <TRACE>... --live <TRACE>   Record templates, then match a live trace
//!   uwave synth --output <PATH> --shape <SHAPE>        Generate a synthetic trace
//!   uwave info <TRACE>                                 Show trace information
//!   uwave config                                       Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uwave_common::config::AppConfig;
use uwave_trace::{Shape, SynthConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "uwave",
    about = "Accelerometer gesture recognition by incremental time warping",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record template traces as gestures, then match a live trace against them
    Match {
        /// Template trace; repeat for several gestures
        #[arg(short, long = "template", required = true, num_args = 1..)]
        templates: Vec<PathBuf>,

        /// Live trace to evaluate
        #[arg(short, long)]
        live: PathBuf,

        /// Raw samples per frame (defaults to the configured window)
        #[arg(long)]
        window: Option<usize>,

        /// Affinity retention factor (defaults to the configured alpha)
        #[arg(long)]
        alpha: Option<f64>,

        /// Print the best match every N live samples (0 = only at the end)
        #[arg(long, default_value = "0")]
        every: usize,
    },

    /// Generate a deterministic synthetic trace
    Synth {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Motion shape: circle|shake|tilt
        #[arg(long, default_value = "circle")]
        shape: Shape,

        /// Number of axes
        #[arg(long, default_value = "3")]
        axes: usize,

        /// Number of samples
        #[arg(long, default_value = "200")]
        samples: usize,

        /// Sampling rate (Hz)
        #[arg(long, default_value = "100")]
        rate: u32,

        /// Peak raw value of the motion
        #[arg(long, default_value = "1000.0")]
        amplitude: f64,

        /// Peak absolute noise per value
        #[arg(long, default_value = "0")]
        noise: i32,

        /// Noise seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Show trace information
    Info {
        /// Path to the trace file
        path: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    uwave_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Match {
            templates,
            live,
            window,
            alpha,
            every,
        } => commands::matching::run(&config, templates, live, window, alpha, every),
        Commands::Synth {
            output,
            shape,
            axes,
            samples,
            rate,
            amplitude,
            noise,
            seed,
        } => commands::synth::run(
            output,
            SynthConfig {
                shape,
                axis_count: axes,
                samples,
                sample_rate_hz: rate,
                amplitude,
                noise,
                seed,
            },
        ),
        Commands::Info { path } => commands::info::run(path),
        Commands::Config { save } => commands::config::run(&config, save),
    }
}
