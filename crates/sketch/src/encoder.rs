//! Grey-scale grid to sketch command stream.
//!
//! The grid is scanned row by row. Each pixel is classified by whether it
//! matches its left and right neighbours in the same row, and that pair
//! decides which commands are emitted:
//!
//! | matches left | matches right | emitted |
//! |--------------|---------------|---------|
//! | no           | no            | colour + position |
//! | no           | yes           | colour only (start of a run) |
//! | yes          | no            | position only (end of a run) |
//! | yes          | yes           | nothing (inside a run) |
//!
//! Replaying the stream draws one line per run, from the end of the
//! previous run to the end of this one.

use tracing::debug;

use crate::error::EncodeError;
use crate::limits::MAX_GRID_DIMENSION;
use crate::stream::Writer;

/// Read access to a rectangular grid of 8-bit grey samples.
pub trait GreyGrid {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Sample at (`row`, `col`). Callers stay within `height` x `width`.
    fn sample(&self, row: usize, col: usize) -> u8;
}

/// Rows shorter than the first read as zero past their end.
impl GreyGrid for Vec<Vec<u8>> {
    fn width(&self) -> usize {
        self.first().map_or(0, Vec::len)
    }

    fn height(&self) -> usize {
        self.len()
    }

    fn sample(&self, row: usize, col: usize) -> u8 {
        self.get(row).and_then(|r| r.get(col)).copied().unwrap_or(0)
    }
}

impl<const W: usize, const H: usize> GreyGrid for [[u8; W]; H] {
    fn width(&self) -> usize {
        W
    }

    fn height(&self) -> usize {
        H
    }

    fn sample(&self, row: usize, col: usize) -> u8 {
        self[row][col]
    }
}

/// How the left-neighbour test is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// A pixel matches its left neighbour when the samples are equal.
    #[default]
    Equality,
    /// The legacy converter's test: the left flag is set when the samples
    /// *differ*. Pixels that differ from the left and equal the right are
    /// then suppressed. Use this to reproduce that converter's run suppression.
    Legacy,
}

/// Options for grid encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Left-neighbour comparison mode.
    pub comparison: Comparison,
}

impl EncodeOptions {
    /// Creates default encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options matching the legacy converter's neighbour test.
    pub fn legacy() -> Self {
        Self {
            comparison: Comparison::Legacy,
        }
    }
}

/// Neighbour flags for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbours {
    /// Left flag, computed per [`Comparison`]. Always false in column 0.
    pub matches_left: bool,
    /// Right sample equals this one. Always false in the last column.
    pub matches_right: bool,
}

impl Neighbours {
    /// Computes the flags for (`row`, `col`).
    pub fn of<G: GreyGrid + ?Sized>(grid: &G, row: usize, col: usize, comparison: Comparison) -> Self {
        let value = grid.sample(row, col);
        let matches_left = col > 0 && {
            let left = grid.sample(row, col - 1);
            match comparison {
                Comparison::Equality => left == value,
                Comparison::Legacy => left != value,
            }
        };
        let matches_right = col + 1 < grid.width() && grid.sample(row, col + 1) == value;
        Self {
            matches_left,
            matches_right,
        }
    }

    /// True when the pixel emits no commands.
    pub fn is_suppressed(self) -> bool {
        self.matches_left && self.matches_right
    }
}

/// Writes the commands for one pixel given its neighbour flags.
///
/// Both flags set means the pixel sits inside a run; [`encode_grid`] skips
/// such pixels, but called directly this writes the full colour and
/// position sequence.
pub fn write_pixel_commands(
    writer: &mut Writer,
    grey: u8,
    row: u32,
    col: u32,
    neighbours: Neighbours,
) -> Result<(), EncodeError> {
    match (neighbours.matches_left, neighbours.matches_right) {
        (false, true) => writer.write_grey(grey),
        (true, false) => writer.write_position(row, col)?,
        (false, false) | (true, true) => {
            writer.write_grey(grey);
            writer.write_position(row, col)?;
        }
    }
    Ok(())
}

/// Returns the commands for one pixel given its neighbour flags.
pub fn generate_commands(
    grey: u8,
    row: u32,
    col: u32,
    matches_left: bool,
    matches_right: bool,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(14);
    write_pixel_commands(
        &mut writer,
        grey,
        row,
        col,
        Neighbours {
            matches_left,
            matches_right,
        },
    )?;
    Ok(writer.into_bytes())
}

/// Encodes a grid with default options.
pub fn encode_grid<G: GreyGrid + ?Sized>(grid: &G) -> Result<Vec<u8>, EncodeError> {
    encode_grid_with_options(grid, EncodeOptions::default())
}

/// Encodes a grid into a sketch command stream.
///
/// Grids wider or taller than 256 are rejected, since their coordinates do
/// not fit the two-chunk target encoding.
pub fn encode_grid_with_options<G: GreyGrid + ?Sized>(
    grid: &G,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (grid.width(), grid.height());
    if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(EncodeError::GridTooLarge {
            width,
            height,
            max: MAX_GRID_DIMENSION,
        });
    }

    let mut writer = Writer::with_capacity(width * height * 2);
    let mut suppressed = 0usize;

    for row in 0..height {
        for col in 0..width {
            let neighbours = Neighbours::of(grid, row, col, options.comparison);
            if neighbours.is_suppressed() {
                suppressed += 1;
                continue;
            }
            let grey = grid.sample(row, col);
            write_pixel_commands(&mut writer, grey, row as u32, col as u32, neighbours)?;
        }
    }

    debug!(
        width,
        height,
        bytes = writer.len(),
        suppressed,
        comparison = ?options.comparison,
        "encoded grid"
    );
    Ok(writer.into_bytes())
}
