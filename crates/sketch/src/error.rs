//! Error types for sketch encoding and image I/O.
//!
//! Decoding has no error type: every one of the 256 byte values is a
//! valid command.

use thiserror::Error;

/// Error during command encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{axis} coordinate {value} out of range (max {max})")]
    CoordinateOutOfRange {
        axis: &'static str,
        value: u32,
        max: u32,
    },

    #[error("grid {width}x{height} exceeds maximum dimension {max}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("colour {value:#x} exceeds 24 bits")]
    ColourOutOfRange { value: u32 },

    #[error("value {value:#x} does not fit in {chunks} data chunks")]
    ValueTooWide { value: u32, chunks: usize },

    #[error("data chunk count {chunks} outside 1..={max}")]
    InvalidChunkCount { chunks: usize, max: usize },

    #[error("move delta {value} out of range [-32, 31]")]
    DeltaOutOfRange { value: i32 },
}

/// Error while reading a grey-map or writing a rendered image.
#[derive(Debug, Error)]
pub enum PgmError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("sample count {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}
