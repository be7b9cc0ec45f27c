//! Sketch CLI - convert grey-maps to sketch files and play them back
//!
//! # Commands
//!
//! - `sketch convert` - Encode a PGM grey-map as a `.sk` command stream
//! - `sketch view` - Play a `.sk` file onto a canvas and export it as PPM
//! - `sketch test` - Check the command generators against known cases
//!
//! # Usage
//!
//! ```bash
//! # Writes photo.sk next to the input
//! sketch convert photo.pgm
//!
//! # Render the first frame to photo.ppm
//! sketch view photo.sk --no-delay
//!
//! # More detail on what the encoder and player do
//! RUST_LOG=sketch=trace sketch view photo.sk
//! ```

mod convert;
mod selftest;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Sketch CLI - convert grey-maps to sketch files and play them back
#[derive(Parser)]
#[command(name = "sketch")]
#[command(about = "Convert grey-maps to sketch command streams and play them back")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a PGM grey-map as a sketch file
    Convert(convert::ConvertArgs),

    /// Play a sketch file and write the rendered canvas as PPM
    View(view::ViewArgs),

    /// Run the built-in command generator checks
    Test,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => convert::execute(args),
        Commands::View(args) => view::execute(args),
        Commands::Test => selftest::execute(),
    }
}
