//! Command byte layout for the sketch format.
//!
//! Every command is a single byte:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +-------+-----------------------+
//! |opcode |        operand        |
//! +-------+-----------------------+
//! ```
//!
//! | Opcode | Bits | Operand |
//! |--------|------|---------|
//! | `DX`   | `00` | signed delta, -32..=31, added to the target x |
//! | `DY`   | `01` | signed delta, -32..=31, added to the target y; fires a draw |
//! | `TOOL` | `10` | unsigned selector, see [`Tool`] |
//! | `DATA` | `11` | unsigned 6-bit chunk shifted into the data accumulator |
//!
//! Values wider than six bits are sent as consecutive DATA chunks, most
//! significant chunk first, and consumed by the TOOL command that follows.

use std::fmt;

use crate::error::EncodeError;
use crate::limits::{MAX_CHUNK, MAX_DELTA, MIN_DELTA, OPERAND_BITS, OPERAND_MASK};
use crate::stream::Writer;

// Opcode bit patterns
const OP_DX: u8 = 0b00;
const OP_DY: u8 = 0b01;
const OP_TOOL: u8 = 0b10;
const OP_DATA: u8 = 0b11;

// Tool selectors
const TOOL_NONE: u8 = 0;
const TOOL_LINE: u8 = 1;
const TOOL_BLOCK: u8 = 2;
const TOOL_COLOUR: u8 = 3;
const TOOL_TARGET_X: u8 = 4;
const TOOL_TARGET_Y: u8 = 5;
const TOOL_SHOW: u8 = 6;
const TOOL_PAUSE: u8 = 7;
const TOOL_NEXT_FRAME: u8 = 8;

/// Fixed DATA bytes sent after the four colour chunks, before `TOOL COLOUR`.
///
/// Existing sketch files carry these two bytes after every colour, so the
/// encoder always reproduces them.
pub const COLOUR_TAIL: [u8; 2] = [(OP_DATA << 6) | 63, (OP_DATA << 6) | 3];

// =============================================================================
// OPCODES AND TOOLS
// =============================================================================

/// The 2-bit operation selector in bits 7-6 of a command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Add a signed delta to the target x.
    MoveX,
    /// Add a signed delta to the target y, then draw with the active tool.
    MoveY,
    /// Select a tool or run a pseudo-tool action.
    Tool,
    /// Shift a 6-bit chunk into the data accumulator.
    Data,
}

impl Opcode {
    /// Returns the opcode carried by `byte`.
    pub fn of(byte: u8) -> Self {
        match byte >> 6 {
            OP_DX => Opcode::MoveX,
            OP_DY => Opcode::MoveY,
            OP_TOOL => Opcode::Tool,
            _ => Opcode::Data,
        }
    }

    /// Returns the 2-bit pattern for this opcode.
    pub fn bits(self) -> u8 {
        match self {
            Opcode::MoveX => OP_DX,
            Opcode::MoveY => OP_DY,
            Opcode::Tool => OP_TOOL,
            Opcode::Data => OP_DATA,
        }
    }

    /// Short mnemonic used in listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::MoveX => "DX",
            Opcode::MoveY => "DY",
            Opcode::Tool => "TOOL",
            Opcode::Data => "DATA",
        }
    }
}

/// Selector space of the TOOL opcode.
///
/// Drawing tools (`None`, `Line`, `Block`) change how subsequent `DY`
/// commands draw; the rest are one-shot actions. Selectors with no meaning
/// decode to [`Tool::Unknown`] and are ignored by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    None,
    Line,
    Block,
    /// Set the drawing colour from the accumulated data.
    Colour,
    /// Set the target x from the accumulated data.
    TargetX,
    /// Set the target y from the accumulated data.
    TargetY,
    /// Present the drawing so far.
    Show,
    /// Pause for the accumulated number of milliseconds.
    Pause,
    /// End the current frame; playback resumes after this command.
    NextFrame,
    /// Reserved selector.
    Unknown(u8),
}

impl Tool {
    /// Decodes a 6-bit selector. Bits above the operand are ignored.
    pub fn from_selector(selector: u8) -> Self {
        match selector & OPERAND_MASK {
            TOOL_NONE => Tool::None,
            TOOL_LINE => Tool::Line,
            TOOL_BLOCK => Tool::Block,
            TOOL_COLOUR => Tool::Colour,
            TOOL_TARGET_X => Tool::TargetX,
            TOOL_TARGET_Y => Tool::TargetY,
            TOOL_SHOW => Tool::Show,
            TOOL_PAUSE => Tool::Pause,
            TOOL_NEXT_FRAME => Tool::NextFrame,
            other => Tool::Unknown(other),
        }
    }

    /// Returns the 6-bit selector for this tool.
    pub fn selector(self) -> u8 {
        match self {
            Tool::None => TOOL_NONE,
            Tool::Line => TOOL_LINE,
            Tool::Block => TOOL_BLOCK,
            Tool::Colour => TOOL_COLOUR,
            Tool::TargetX => TOOL_TARGET_X,
            Tool::TargetY => TOOL_TARGET_Y,
            Tool::Show => TOOL_SHOW,
            Tool::Pause => TOOL_PAUSE,
            Tool::NextFrame => TOOL_NEXT_FRAME,
            Tool::Unknown(selector) => selector & OPERAND_MASK,
        }
    }

    /// Returns the drawing tool this selector switches to, if it is one.
    pub fn draw_tool(self) -> Option<DrawTool> {
        match self {
            Tool::None => Some(DrawTool::None),
            Tool::Line => Some(DrawTool::Line),
            Tool::Block => Some(DrawTool::Block),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::None => f.write_str("NONE"),
            Tool::Line => f.write_str("LINE"),
            Tool::Block => f.write_str("BLOCK"),
            Tool::Colour => f.write_str("COLOUR"),
            Tool::TargetX => f.write_str("TARGETX"),
            Tool::TargetY => f.write_str("TARGETY"),
            Tool::Show => f.write_str("SHOW"),
            Tool::Pause => f.write_str("PAUSE"),
            Tool::NextFrame => f.write_str("NEXTFRAME"),
            Tool::Unknown(selector) => write!(f, "UNKNOWN({selector})"),
        }
    }
}

/// The drawing tool held by the pen between draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawTool {
    /// Move without drawing.
    None,
    /// Draw a line from the pen to the target.
    #[default]
    Line,
    /// Fill the rectangle spanned by the pen and the target.
    Block,
}

impl From<DrawTool> for Tool {
    fn from(tool: DrawTool) -> Self {
        match tool {
            DrawTool::None => Tool::None,
            DrawTool::Line => Tool::Line,
            DrawTool::Block => Tool::Block,
        }
    }
}

/// Coordinate axis addressed by a SET_TARGET command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Lower-case axis name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }

    /// The pseudo-tool that moves the target along this axis.
    pub fn target_tool(self) -> Tool {
        match self {
            Axis::X => Tool::TargetX,
            Axis::Y => Tool::TargetY,
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// A decoded command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveX(i8),
    MoveY(i8),
    Tool(Tool),
    Data(u8),
}

impl Command {
    /// Decodes a command byte. Every byte value is a valid command.
    pub fn decode(byte: u8) -> Self {
        match Opcode::of(byte) {
            Opcode::MoveX => Command::MoveX(signed_operand(byte)),
            Opcode::MoveY => Command::MoveY(signed_operand(byte)),
            Opcode::Tool => Command::Tool(Tool::from_selector(operand(byte))),
            Opcode::Data => Command::Data(operand(byte)),
        }
    }

    /// Encodes this command as a byte.
    ///
    /// Operands are masked to six bits; use [`Command::move_x`],
    /// [`Command::move_y`] and [`Command::data`] to build range-checked
    /// commands.
    pub fn encode(self) -> u8 {
        let operand = match self {
            Command::MoveX(delta) | Command::MoveY(delta) => delta as u8,
            Command::Tool(tool) => tool.selector(),
            Command::Data(chunk) => chunk,
        };
        (self.opcode().bits() << 6) | (operand & OPERAND_MASK)
    }

    /// Returns the opcode of this command.
    pub fn opcode(self) -> Opcode {
        match self {
            Command::MoveX(_) => Opcode::MoveX,
            Command::MoveY(_) => Opcode::MoveY,
            Command::Tool(_) => Opcode::Tool,
            Command::Data(_) => Opcode::Data,
        }
    }

    /// Builds a MOVE_X_DELTA command, checking the delta range.
    pub fn move_x(delta: i32) -> Result<Self, EncodeError> {
        Ok(Command::MoveX(checked_delta(delta)?))
    }

    /// Builds a MOVE_Y_DELTA command, checking the delta range.
    pub fn move_y(delta: i32) -> Result<Self, EncodeError> {
        Ok(Command::MoveY(checked_delta(delta)?))
    }

    /// Builds a DATA command, checking the chunk fits six bits.
    pub fn data(chunk: u8) -> Result<Self, EncodeError> {
        if chunk > MAX_CHUNK {
            return Err(EncodeError::ValueTooWide {
                value: u32::from(chunk),
                chunks: 1,
            });
        }
        Ok(Command::Data(chunk))
    }
}

fn checked_delta(delta: i32) -> Result<i8, EncodeError> {
    if delta < i32::from(MIN_DELTA) || delta > i32::from(MAX_DELTA) {
        return Err(EncodeError::DeltaOutOfRange { value: delta });
    }
    Ok(delta as i8)
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        Command::decode(byte)
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.encode()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Command::MoveX(delta) | Command::MoveY(delta) => write!(f, "{mnemonic} {delta}"),
            Command::Tool(tool) => write!(f, "{mnemonic} {tool}"),
            Command::Data(chunk) => write!(f, "{mnemonic} {chunk}"),
        }
    }
}

/// Returns the opcode in the top two bits of `byte`.
#[inline]
pub fn opcode(byte: u8) -> Opcode {
    Opcode::of(byte)
}

/// Returns the low six bits of `byte`, unsigned.
///
/// DATA and TOOL use this directly; DX and DY reinterpret it through
/// [`signed_operand`].
#[inline]
pub fn operand(byte: u8) -> u8 {
    byte & OPERAND_MASK
}

/// Returns the low six bits of `byte` as a two's-complement value in -32..=31.
#[inline]
pub fn signed_operand(byte: u8) -> i8 {
    let raw = operand(byte) as i8;
    if raw >= 32 { raw - 64 } else { raw }
}

// =============================================================================
// COMMAND GENERATORS
// =============================================================================

/// Number of DATA chunks needed to carry `value` (at least one).
pub fn chunks_for(value: u32) -> usize {
    let bits = u32::BITS - value.leading_zeros();
    bits.div_ceil(OPERAND_BITS).max(1) as usize
}

/// Packs a grey sample into a 24-bit colour with equal channels.
pub fn grey_colour(grey: u8) -> u32 {
    u32::from(grey) * 0x01_0101
}

/// Splits `value` into `chunk_count` DATA command bytes, most significant first.
pub fn encode_data_chunks(value: u32, chunk_count: usize) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(chunk_count);
    writer.write_data_chunks(value, chunk_count)?;
    Ok(writer.into_bytes())
}

/// Colour-set commands for a grey sample: four chunks, the fixed tail, `TOOL COLOUR`.
pub fn colour_commands(grey: u8) -> Vec<u8> {
    let mut writer = Writer::with_capacity(7);
    writer.write_grey(grey);
    writer.into_bytes()
}

/// DATA chunks plus the SET_TARGET command for one coordinate.
pub fn coordinate_commands(axis: Axis, value: u32) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(3);
    writer.write_coordinate(axis, value)?;
    Ok(writer.into_bytes())
}

/// Position-set commands for the pixel at (`row`, `col`), ending with the
/// zero `DY` that triggers the draw.
pub fn position_commands(row: u32, col: u32) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(7);
    writer.write_position(row, col)?;
    Ok(writer.into_bytes())
}

/// Colour-set commands followed by position-set commands.
pub fn colour_and_position_commands(grey: u8, row: u32, col: u32) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(14);
    writer.write_grey(grey);
    writer.write_position(row, col)?;
    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_opcode_boundaries() {
        assert_eq!(opcode(0x00), Opcode::MoveX);
        assert_eq!(opcode(0x3F), Opcode::MoveX);
        assert_eq!(opcode(0x40), Opcode::MoveY);
        assert_eq!(opcode(0x7F), Opcode::MoveY);
        assert_eq!(opcode(0x80), Opcode::Tool);
        assert_eq!(opcode(0xBF), Opcode::Tool);
        assert_eq!(opcode(0xC0), Opcode::Data);
        assert_eq!(opcode(0xFF), Opcode::Data);
    }

    #[test]
    fn test_signed_operand() {
        assert_eq!(signed_operand(0x00), 0);
        assert_eq!(signed_operand(0x1F), 31);
        assert_eq!(signed_operand(0x20), -32);
        assert_eq!(signed_operand(0x3F), -1);
        assert_eq!(signed_operand(0x7F), -1);
    }

    #[test]
    fn test_data_operand_is_unsigned() {
        assert_eq!(Command::decode(0xFF), Command::Data(63));
        assert_eq!(Command::decode(0xE0), Command::Data(32));
    }

    #[test]
    fn test_tool_selectors() {
        assert_eq!(Command::decode(0x80), Command::Tool(Tool::None));
        assert_eq!(Command::decode(0x83), Command::Tool(Tool::Colour));
        assert_eq!(Command::decode(0x88), Command::Tool(Tool::NextFrame));
        assert_eq!(Command::decode(0x89), Command::Tool(Tool::Unknown(9)));
        assert_eq!(Command::decode(0xBF), Command::Tool(Tool::Unknown(63)));
        assert_eq!(Tool::Unknown(9).selector(), 9);
    }

    #[test]
    fn test_draw_tool_mapping() {
        assert_eq!(Tool::Block.draw_tool(), Some(DrawTool::Block));
        assert_eq!(Tool::Show.draw_tool(), None);
        assert_eq!(Tool::from(DrawTool::None), Tool::None);
        assert_eq!(DrawTool::default(), DrawTool::Line);
    }

    #[test]
    fn test_checked_constructors() {
        assert_eq!(Command::move_x(-32).unwrap().encode(), 0x20);
        assert_eq!(Command::move_y(0).unwrap().encode(), 0x40);
        assert!(Command::move_y(-33).is_err());
        assert!(Command::data(64).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::MoveX(-3).to_string(), "DX -3");
        assert_eq!(Command::Tool(Tool::TargetY).to_string(), "TOOL TARGETY");
        assert_eq!(Command::Data(63).to_string(), "DATA 63");
        assert_eq!(Command::Tool(Tool::Unknown(12)).to_string(), "TOOL UNKNOWN(12)");
    }

    #[test]
    fn test_chunks_for() {
        assert_eq!(chunks_for(0), 1);
        assert_eq!(chunks_for(63), 1);
        assert_eq!(chunks_for(64), 2);
        assert_eq!(chunks_for(255), 2);
        assert_eq!(chunks_for(0xFF_FFFF), 4);
        assert_eq!(chunks_for(u32::MAX), 6);
    }

    #[test]
    fn test_colour_commands_layout() {
        // 0x0A0A0A splits into 2, 32, 40, 10
        assert_eq!(
            colour_commands(10),
            vec![0xC2, 0xE0, 0xE8, 0xCA, 0xFF, 0xC3, 0x83]
        );
        assert_eq!(colour_commands(0), vec![0xC0, 0xC0, 0xC0, 0xC0, 0xFF, 0xC3, 0x83]);
        assert_eq!(colour_commands(255), vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC3, 0x83]);
    }

    #[test]
    fn test_coordinate_two_chunks() {
        let bytes = coordinate_commands(Axis::X, 200).unwrap();
        assert_eq!(bytes.len(), 3);
        assert_eq!(Command::decode(bytes[2]), Command::Tool(Tool::TargetX));
        let (high, low) = (operand(bytes[0]) as u32, operand(bytes[1]) as u32);
        assert_eq!((high << 6) | low, 200);
    }

    #[test]
    fn test_coordinate_single_chunk() {
        assert_eq!(coordinate_commands(Axis::Y, 63).unwrap(), vec![0xFF, 0x85]);
        assert_eq!(coordinate_commands(Axis::Y, 64).unwrap(), vec![0xC1, 0xC0, 0x85]);
    }

    #[test]
    fn test_colour_and_position_is_concatenation() {
        let mut expected = colour_commands(69);
        expected.extend(position_commands(134, 134).unwrap());
        assert_eq!(colour_and_position_commands(69, 134, 134).unwrap(), expected);
        assert_eq!(expected.len(), 14);
    }

    proptest! {
        #[test]
        fn prop_every_byte_decodes_and_reencodes(byte in any::<u8>()) {
            let command = Command::decode(byte);
            prop_assert_eq!(command.opcode(), opcode(byte));
            prop_assert_eq!(command.encode(), byte);
        }

        #[test]
        fn prop_coordinate_chunks_reconstruct(value in 0u32..=255) {
            let bytes = coordinate_commands(Axis::X, value).unwrap();
            let (tool, chunks) = bytes.split_last().unwrap();
            prop_assert_eq!(Command::decode(*tool), Command::Tool(Tool::TargetX));
            let rebuilt = chunks.iter().fold(0u32, |acc, b| (acc << 6) | operand(*b) as u32);
            prop_assert_eq!(rebuilt, value);
        }

        #[test]
        fn prop_data_chunks_reconstruct(value in 0u32..=0xFF_FFFF) {
            let bytes = encode_data_chunks(value, 4).unwrap();
            prop_assert!(bytes.iter().all(|b| opcode(*b) == Opcode::Data));
            let rebuilt = bytes.iter().fold(0u32, |acc, b| (acc << 6) | operand(*b) as u32);
            prop_assert_eq!(rebuilt, value);
        }
    }
}
