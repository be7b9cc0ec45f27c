//! Sketch: a compact binary command format for 2D line and block drawings.
//!
//! This crate provides the command model, an encoder from grey-scale grids
//! to command streams, and a resumable executor that replays streams
//! against a drawing surface.
//!
//! # Overview
//!
//! A sketch file is a headerless sequence of one-byte commands. The top two
//! bits select an opcode and the low six bits carry its operand:
//! - **DX / DY**: signed deltas moving the pen's target; DY also draws
//! - **TOOL**: selects a drawing tool or runs an action (colour, target,
//!   show, pause, next frame)
//! - **DATA**: 6-bit chunks accumulated into wider values for TOOL commands
//!
//! # Quick Start
//!
//! ```rust
//! use sketch::{encode_grid, play_frame, Canvas, Pen};
//!
//! let grid = [[10u8, 10], [10, 200]];
//! let stream = encode_grid(&grid).unwrap();
//!
//! let mut canvas = Canvas::new(2, 2);
//! let mut pen = Pen::new();
//! let outcome = play_frame(&stream, &mut pen, &mut canvas);
//! assert!(outcome.end_of_stream);
//! ```
//!
//! # Modules
//!
//! - [`command`]: Byte layout, opcodes, tools and command generators
//! - [`stream`]: Resumable reader and command writer
//! - [`encoder`]: Grid to command stream conversion
//! - [`decoder`]: Pen state, surfaces and frame playback
//! - [`pgm`]: Grey-map input
//! - [`canvas`]: Software surface for headless rendering
//! - [`error`]: Error types
//! - [`limits`]: Numeric bounds of the format

pub mod canvas;
pub mod command;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod limits;
pub mod pgm;
pub mod stream;

// Re-export commonly used types at crate root
pub use canvas::Canvas;
pub use command::{
    Axis, Command, DrawTool, Opcode, Tool, colour_and_position_commands, colour_commands,
    encode_data_chunks, opcode, operand, position_commands, signed_operand,
};
pub use decoder::{DrawEvent, EventLog, FrameOutcome, Pen, Player, Surface, obey, play_frame};
pub use encoder::{
    Comparison, EncodeOptions, GreyGrid, encode_grid, encode_grid_with_options, generate_commands,
};
pub use error::{EncodeError, PgmError};
pub use pgm::{Greymap, parse_pgm, read_pgm};
pub use stream::{Reader, Writer};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension used for sketch command streams.
pub const FILE_EXTENSION: &str = "sk";
