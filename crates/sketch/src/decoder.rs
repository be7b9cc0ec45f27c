//! Sketch command stream playback.
//!
//! A [`Pen`] holds the playback state: current position, pending target,
//! drawing tool, the DATA accumulator and the offset the next frame resumes
//! from. [`play_frame`] runs commands against a [`Surface`] until a
//! `NEXT_FRAME` command or the end of the stream, then hands the cursor back
//! through the pen.
//!
//! Playback is total: every byte is a command and unknown tool selectors are
//! ignored, so there is no error path.

use tracing::{debug, trace};

use crate::command::{Command, DrawTool, Tool};
use crate::limits::OPERAND_BITS;
use crate::stream::Reader;

/// Drawing target for playback.
///
/// Coordinates are pen units; a surface decides how they map to pixels and
/// clips anything outside its area.
pub trait Surface {
    /// Draw a line from (`x0`, `y0`) to (`x1`, `y1`), both ends included.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    /// Fill a block with top-left (`x`, `y`). Width and height may be
    /// negative when the target lies above or left of the pen.
    fn draw_block(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Set the drawing colour from a packed `0xRRGGBBAA` value.
    fn set_colour(&mut self, rgba: u32);

    /// Make everything drawn so far visible.
    fn present(&mut self);

    /// Wait for `millis` milliseconds.
    fn pause(&mut self, millis: u32);
}

/// Playback state for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pen {
    /// Current position.
    pub x: i32,
    pub y: i32,
    /// Pending target, moved by `DX`/`DY` and SET_TARGET commands.
    pub tx: i32,
    pub ty: i32,
    /// Active drawing tool.
    pub tool: DrawTool,
    /// DATA accumulator. Chunks shift in from the right; bits shifted past
    /// 32 are lost.
    pub data: u32,
    /// Offset the next [`play_frame`] call starts reading from.
    pub resume_offset: usize,
    /// Set once `NEXT_FRAME` has been obeyed in the current call.
    pub frame_ended: bool,
}

impl Default for Pen {
    fn default() -> Self {
        Self::new()
    }
}

impl Pen {
    /// Creates a pen at the origin with the LINE tool.
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            tx: 0,
            ty: 0,
            tool: DrawTool::Line,
            data: 0,
            resume_offset: 0,
            frame_ended: false,
        }
    }

    /// Clears position, target, tool and the frame flag after a frame.
    ///
    /// The accumulator and resume offset survive, so the next frame picks
    /// up where this one stopped.
    fn reset_drawing_state(&mut self) {
        self.x = 0;
        self.y = 0;
        self.tx = 0;
        self.ty = 0;
        self.tool = DrawTool::Line;
        self.frame_ended = false;
    }

    /// Takes the accumulated value and clears the accumulator.
    fn take_data(&mut self) -> u32 {
        std::mem::take(&mut self.data)
    }
}

/// Executes one command against the pen and surface.
pub fn obey<S: Surface + ?Sized>(pen: &mut Pen, command: Command, surface: &mut S) {
    trace!(%command, "obey");
    match command {
        Command::MoveX(delta) => {
            pen.tx = pen.tx.wrapping_add(i32::from(delta));
        }
        Command::MoveY(delta) => {
            pen.ty = pen.ty.wrapping_add(i32::from(delta));
            match pen.tool {
                DrawTool::Line => surface.draw_line(pen.x, pen.y, pen.tx, pen.ty),
                DrawTool::Block => surface.draw_block(
                    pen.x,
                    pen.y,
                    pen.tx.wrapping_sub(pen.x),
                    pen.ty.wrapping_sub(pen.y),
                ),
                DrawTool::None => {}
            }
            pen.x = pen.tx;
            pen.y = pen.ty;
        }
        Command::Data(chunk) => {
            pen.data = (pen.data << OPERAND_BITS) | u32::from(chunk);
        }
        Command::Tool(tool) => obey_tool(pen, tool, surface),
    }
}

fn obey_tool<S: Surface + ?Sized>(pen: &mut Pen, tool: Tool, surface: &mut S) {
    match tool {
        Tool::None => pen.tool = DrawTool::None,
        Tool::Line => pen.tool = DrawTool::Line,
        Tool::Block => pen.tool = DrawTool::Block,
        Tool::Colour => {
            let rgba = pen.take_data();
            surface.set_colour(rgba);
        }
        Tool::TargetX => pen.tx = pen.take_data() as i32,
        Tool::TargetY => pen.ty = pen.take_data() as i32,
        Tool::Show => {
            pen.data = 0;
            surface.present();
        }
        Tool::Pause => {
            let millis = pen.take_data();
            surface.pause(millis);
        }
        Tool::NextFrame => {
            pen.data = 0;
            pen.frame_ended = true;
        }
        Tool::Unknown(_) => pen.data = 0,
    }
}

/// Result of one [`play_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Offset the frame started at.
    pub start_offset: usize,
    /// Offset the next frame will start at (0 after the end of the stream).
    pub resume_offset: usize,
    /// Number of commands obeyed.
    pub commands: usize,
    /// True when the stream ran out rather than hitting `NEXT_FRAME`.
    pub end_of_stream: bool,
}

/// Plays one frame of `stream`, starting at `pen.resume_offset`.
///
/// Commands run until `NEXT_FRAME` (the pen then resumes just after it) or
/// the end of the stream (the pen then resumes from 0 with a cleared
/// accumulator). The surface is presented once at the end, and the pen's
/// position, target and tool are reset, so calling this repeatedly on a
/// stream without `NEXT_FRAME` redraws the same picture each time.
pub fn play_frame<S: Surface + ?Sized>(stream: &[u8], pen: &mut Pen, surface: &mut S) -> FrameOutcome {
    let start_offset = pen.resume_offset;
    let mut reader = Reader::at(stream, start_offset);
    let mut commands = 0;
    let mut end_of_stream = false;

    while !pen.frame_ended {
        let Some(command) = reader.read_command() else {
            pen.resume_offset = 0;
            pen.data = 0;
            end_of_stream = true;
            break;
        };
        obey(pen, command, surface);
        commands += 1;
        if pen.frame_ended {
            pen.resume_offset = reader.position();
        }
    }

    surface.present();
    pen.reset_drawing_state();

    let outcome = FrameOutcome {
        start_offset,
        resume_offset: pen.resume_offset,
        commands,
        end_of_stream,
    };
    debug!(
        start = outcome.start_offset,
        resume = outcome.resume_offset,
        commands = outcome.commands,
        end_of_stream = outcome.end_of_stream,
        "played frame"
    );
    outcome
}

/// A playback session over an owned command stream.
#[derive(Debug, Clone)]
pub struct Player {
    stream: Vec<u8>,
    pen: Pen,
}

impl Player {
    /// Creates a player positioned at the start of `stream`.
    pub fn new(stream: Vec<u8>) -> Self {
        Self {
            stream,
            pen: Pen::new(),
        }
    }

    /// Reads a sketch file into a new player.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Plays the next frame.
    pub fn play_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameOutcome {
        play_frame(&self.stream, &mut self.pen, surface)
    }

    /// Current playback state.
    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Restarts playback from the beginning of the stream.
    pub fn rewind(&mut self) {
        self.pen = Pen::new();
    }
}

// =============================================================================
// EVENT RECORDING
// =============================================================================

/// A surface call captured by [`EventLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawEvent {
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
    Block { x: i32, y: i32, width: i32, height: i32 },
    Colour(u32),
    Present,
    Pause(u32),
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<DrawEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events and clears the log.
    pub fn drain(&mut self) -> Vec<DrawEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of line and block draws recorded.
    pub fn draw_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DrawEvent::Line { .. } | DrawEvent::Block { .. }))
            .count()
    }
}

impl Surface for EventLog {
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.events.push(DrawEvent::Line { x0, y0, x1, y1 });
    }

    fn draw_block(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.events.push(DrawEvent::Block {
            x,
            y,
            width,
            height,
        });
    }

    fn set_colour(&mut self, rgba: u32) {
        self.events.push(DrawEvent::Colour(rgba));
    }

    fn present(&mut self) {
        self.events.push(DrawEvent::Present);
    }

    fn pause(&mut self, millis: u32) {
        self.events.push(DrawEvent::Pause(millis));
    }
}
