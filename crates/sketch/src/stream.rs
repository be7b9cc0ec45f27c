//! Byte-level reading and writing of sketch command streams.
//!
//! [`Reader`] is a cursor over an in-memory stream that can be re-opened at
//! any offset, which is how multi-frame playback resumes. [`Writer`] builds
//! streams out of commands and multi-chunk DATA values.

use crate::command::{Axis, Command, Tool};
use crate::error::EncodeError;
use crate::limits::{
    COLOUR_CHUNKS, MAX_COLOUR, MAX_COORDINATE, MAX_DATA_CHUNKS, OPERAND_BITS, OPERAND_MASK,
};

// =============================================================================
// DECODING
// =============================================================================

/// Cursor over a sketch command stream.
///
/// Reading never fails: the stream has no framing, so the only condition a
/// reader reports is running out of bytes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at `offset`, clamped to the end of `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Returns the current offset into the stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to `offset`, clamped to the end of the stream.
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.data.len());
    }

    /// Returns the number of unread bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single raw byte.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads and decodes the next command.
    #[inline]
    pub fn read_command(&mut self) -> Option<Command> {
        self.read_byte().map(Command::decode)
    }
}

impl Iterator for Reader<'_> {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        self.read_command()
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for building sketch command streams.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single raw byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes one command.
    #[inline]
    pub fn write_command(&mut self, command: Command) {
        self.buf.push(command.encode());
    }

    /// Writes a TOOL command.
    pub fn write_tool(&mut self, tool: Tool) {
        self.write_command(Command::Tool(tool));
    }

    /// Writes a MOVE_X_DELTA command.
    pub fn write_move_x(&mut self, delta: i32) -> Result<(), EncodeError> {
        self.write_command(Command::move_x(delta)?);
        Ok(())
    }

    /// Writes a MOVE_Y_DELTA command.
    ///
    /// With the LINE or BLOCK tool active this is what triggers a draw.
    pub fn write_move_y(&mut self, delta: i32) -> Result<(), EncodeError> {
        self.write_command(Command::move_y(delta)?);
        Ok(())
    }

    /// Writes `value` as `chunk_count` DATA commands, most significant first.
    pub fn write_data_chunks(&mut self, value: u32, chunk_count: usize) -> Result<(), EncodeError> {
        if chunk_count == 0 || chunk_count > MAX_DATA_CHUNKS {
            return Err(EncodeError::InvalidChunkCount {
                chunks: chunk_count,
                max: MAX_DATA_CHUNKS,
            });
        }
        let bits = chunk_count as u32 * OPERAND_BITS;
        if bits < u32::BITS && value >> bits != 0 {
            return Err(EncodeError::ValueTooWide {
                value,
                chunks: chunk_count,
            });
        }
        self.push_chunks(value, chunk_count);
        Ok(())
    }

    /// Writes the full colour-set sequence for a packed 24-bit colour.
    ///
    /// Four DATA chunks, then the fixed `63, 3` DATA tail, then `TOOL COLOUR`.
    pub fn write_colour(&mut self, rgb: u32) -> Result<(), EncodeError> {
        if rgb > MAX_COLOUR {
            return Err(EncodeError::ColourOutOfRange { value: rgb });
        }
        self.push_colour(rgb);
        Ok(())
    }

    /// Writes the colour-set sequence for a grey sample.
    pub fn write_grey(&mut self, grey: u8) {
        self.push_colour(crate::command::grey_colour(grey));
    }

    /// Writes the DATA chunks and SET_TARGET command for one coordinate.
    ///
    /// Coordinates up to 63 take one chunk; up to 255 take two.
    pub fn write_coordinate(&mut self, axis: Axis, value: u32) -> Result<(), EncodeError> {
        if value > MAX_COORDINATE {
            return Err(EncodeError::CoordinateOutOfRange {
                axis: axis.name(),
                value,
                max: MAX_COORDINATE,
            });
        }
        self.push_chunks(value, crate::command::chunks_for(value));
        self.write_tool(axis.target_tool());
        Ok(())
    }

    /// Writes the position-set sequence for a pixel: target column, target
    /// row, then a zero MOVE_Y_DELTA that fires the draw.
    pub fn write_position(&mut self, row: u32, col: u32) -> Result<(), EncodeError> {
        self.write_coordinate(Axis::X, col)?;
        self.write_coordinate(Axis::Y, row)?;
        self.write_command(Command::MoveY(0));
        Ok(())
    }

    fn push_colour(&mut self, rgb: u32) {
        self.push_chunks(rgb, COLOUR_CHUNKS);
        self.write_bytes(&crate::command::COLOUR_TAIL);
        self.write_tool(Tool::Colour);
    }

    fn push_chunks(&mut self, value: u32, chunk_count: usize) {
        for i in (0..chunk_count).rev() {
            let shift = i as u32 * OPERAND_BITS;
            let chunk = value.checked_shr(shift).unwrap_or(0) as u8 & OPERAND_MASK;
            self.write_command(Command::Data(chunk));
        }
    }
}
