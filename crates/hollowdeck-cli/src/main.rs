//! CLI for hollowdeck, a fabricated terminal hub.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hollowdeck")]
#[command(about = "hollowdeck — a hub that performs coherence without possessing any")]
#[command(version = hollowdeck_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive hub (TUI)
    Hub {
        /// Engine seed; omit for a random session
        #[arg(long)]
        seed: Option<u32>,

        /// Minimum poll interval in milliseconds (caps redraw rate)
        #[arg(long, default_value = "30")]
        refresh_cap: u64,

        /// Path of the persisted drift file
        #[arg(long, default_value = ".hollowdeck_drift")]
        drift_file: String,
    },

    /// Render frames of one pattern to stdout
    Render {
        /// Pattern kind: ruler, void, fluid, gaze, skull
        #[arg(long, default_value = "skull")]
        pattern: String,

        /// Node index (seeds the per-node stream)
        #[arg(long, default_value = "0")]
        index: usize,

        /// Number of frames to render (0 = just the initial frame)
        #[arg(long, default_value = "0")]
        ticks: u32,

        /// Apply the per-frame corruption pass
        #[arg(long)]
        corrupt: bool,
    },

    /// Stream generated feed lines to stdout (pipe-friendly)
    Stream {
        /// Feed to stream
        #[arg(long, default_value = "log", value_parser = ["log", "trace", "status"])]
        feed: String,

        /// Number of lines to emit
        #[arg(long, default_value = "20")]
        lines: usize,

        /// Drift bias in [0, 1.25]
        #[arg(long, default_value = "0.08")]
        drift: f64,

        /// Generator seed; omit for a random stream
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Write a seeded port registry as JSON
    Snapshot {
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<String>,

        /// Registry seed
        #[arg(long, default_value = "0")]
        seed: u32,

        /// Exclude the egress rows
        #[arg(long)]
        no_egress: bool,
    },

    /// Inspect or bump the persisted drift scalar
    Drift {
        /// Path of the persisted drift file
        #[arg(long, default_value = ".hollowdeck_drift")]
        file: String,

        /// Raise drift by this amount before printing
        #[arg(long)]
        bump: Option<f64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hub {
            seed,
            refresh_cap,
            drift_file,
        } => commands::hub::run(seed, refresh_cap, &drift_file),
        Commands::Render {
            pattern,
            index,
            ticks,
            corrupt,
        } => commands::render::run(&pattern, index, ticks, corrupt),
        Commands::Stream {
            feed,
            lines,
            drift,
            seed,
        } => commands::stream::run(&feed, lines, drift, seed),
        Commands::Snapshot {
            output,
            seed,
            no_egress,
        } => commands::snapshot::run(output.as_deref(), seed, !no_egress),
        Commands::Drift { file, bump } => commands::drift::run(&file, bump),
    }
}
