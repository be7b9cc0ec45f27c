//! Convert command - encode a PGM grey-map as a sketch file

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use sketch::{EncodeOptions, FILE_EXTENSION, encode_grid_with_options, read_pgm};

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// Input grey-map (.pgm)
    pub input: PathBuf,

    /// Output sketch file (defaults to the input with a .sk extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the legacy converter's left-neighbour test
    #[arg(long)]
    pub legacy_compare: bool,
}

/// Default output path: the input with its extension replaced.
pub fn sketch_path(input: &Path) -> PathBuf {
    input.with_extension(FILE_EXTENSION)
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let map = read_pgm(&args.input)
        .with_context(|| format!("Unable to read grey-map {}", args.input.display()))?;

    let options = if args.legacy_compare {
        EncodeOptions::legacy()
    } else {
        EncodeOptions::new()
    };
    let stream = encode_grid_with_options(&map, options)
        .with_context(|| format!("Unable to encode {}", args.input.display()))?;

    let output = args.output.unwrap_or_else(|| sketch_path(&args.input));
    std::fs::write(&output, &stream)
        .with_context(|| format!("Unable to write {}", output.display()))?;

    info!(
        width = map.width(),
        height = map.height(),
        bytes = stream.len(),
        "converted {}",
        args.input.display()
    );
    println!("File {} has been written.", output.display());
    Ok(())
}
