//! driftfield command line: open the backdrop in a window or render it to PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use driftfield::{Backdrop, ConnectionStrategy, RunError};

#[derive(Parser)]
#[command(name = "driftfield", version, about = "Animated particle backdrop")]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of particles
    #[arg(short = 'n', long, global = true)]
    count: Option<usize>,

    /// Connection distance in pixels
    #[arg(short, long, global = true)]
    distance: Option<f32>,

    /// Use the grid-binned connection pass (for large counts)
    #[arg(long, global = true)]
    binned: bool,

    /// RNG seed for reproducible output
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render frames off-screen and write the last one as PNG
    Render {
        /// Frames to simulate before writing
        #[arg(short, long, default_value_t = 120)]
        frames: u32,

        /// Output file
        #[arg(short, long, default_value = "driftfield.png")]
        out: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = 720)]
        height: u32,
    },
}

fn build_backdrop(cli: &Cli) -> Result<Backdrop, RunError> {
    let mut backdrop = match &cli.config {
        Some(path) => Backdrop::load(path)?,
        None => Backdrop::new(),
    };
    if let Some(count) = cli.count {
        backdrop = backdrop.with_particle_count(count);
    }
    if let Some(distance) = cli.distance {
        backdrop = backdrop.with_connection_distance(distance);
    }
    if cli.binned {
        backdrop = backdrop.with_strategy(ConnectionStrategy::Binned);
    }
    if let Some(seed) = cli.seed {
        backdrop = backdrop.with_seed(seed);
    }
    Ok(backdrop)
}

fn run(cli: Cli) -> Result<(), RunError> {
    let backdrop = build_backdrop(&cli)?;
    match cli.command {
        None => backdrop.run(),
        Some(Command::Render {
            frames,
            out,
            width,
            height,
        }) => backdrop.export_png(frames, width, height, out),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
