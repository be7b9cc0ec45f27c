//! Numeric bounds of the sketch command format.
//!
//! The encoder rejects values outside these ranges with an
//! [`EncodeError`](crate::error::EncodeError) instead of truncating them.

/// Number of operand bits in a command byte.
pub const OPERAND_BITS: u32 = 6;

/// Mask selecting the operand bits of a command byte.
pub const OPERAND_MASK: u8 = 0x3F;

/// Smallest signed delta a MOVE command can carry.
pub const MIN_DELTA: i8 = -32;

/// Largest signed delta a MOVE command can carry.
pub const MAX_DELTA: i8 = 31;

/// Largest value carried by a single DATA chunk.
pub const MAX_CHUNK: u8 = 0x3F;

/// Largest number of DATA chunks the encoder emits for one value.
///
/// Six chunks cover 36 bits, which already overflows the decoder's 32-bit
/// accumulator; more would only shift out earlier chunks.
pub const MAX_DATA_CHUNKS: usize = 6;

/// Largest target coordinate the encoder can address (two DATA chunks).
pub const MAX_COORDINATE: u32 = 255;

/// Largest grid width or height the encoder accepts.
pub const MAX_GRID_DIMENSION: usize = MAX_COORDINATE as usize + 1;

/// Largest packed colour sent through the four colour chunks.
pub const MAX_COLOUR: u32 = 0xFF_FFFF;

/// Number of DATA chunks used for a packed colour.
pub const COLOUR_CHUNKS: usize = 4;
