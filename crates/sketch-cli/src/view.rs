//! View command - play a sketch file onto a canvas
//!
//! Playback runs headless: frames are drawn into an in-memory canvas and
//! the result is exported as a PPM image. Playback stops when the stream
//! wraps back to its start or after the requested number of frames.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use sketch::canvas::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use sketch::{Canvas, Player, Surface};

/// Arguments for the view command
#[derive(Args)]
pub struct ViewArgs {
    /// Sketch file to play
    pub input: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Stop after this many frames (default: play until the stream wraps)
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Output image (defaults to the input with a .ppm extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write every frame as <stem>-<n>.ppm
    #[arg(long)]
    pub each_frame: bool,

    /// Skip PAUSE waits
    #[arg(long)]
    pub no_delay: bool,
}

/// Canvas that honours PAUSE with a real sleep.
struct Viewer {
    canvas: Canvas,
    delay: bool,
}

impl Surface for Viewer {
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.canvas.draw_line(x0, y0, x1, y1);
    }

    fn draw_block(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.canvas.draw_block(x, y, width, height);
    }

    fn set_colour(&mut self, rgba: u32) {
        self.canvas.set_colour(rgba);
    }

    fn present(&mut self) {
        self.canvas.present();
    }

    fn pause(&mut self, millis: u32) {
        self.canvas.pause(millis);
        if self.delay {
            debug!(millis, "pause");
            thread::sleep(Duration::from_millis(u64::from(millis)));
        }
    }
}

fn frame_path(output: &Path, frame: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    output.with_file_name(format!("{stem}-{frame}.ppm"))
}

/// Plays frames until the stream wraps back to its start or `limit` frames
/// have been played, calling `after_frame` with the frame number after each
/// one. At least one frame is always played. Returns the number played.
fn play_frames<S: Surface>(
    player: &mut Player,
    surface: &mut S,
    limit: Option<usize>,
    mut after_frame: impl FnMut(usize, &S) -> Result<()>,
) -> Result<usize> {
    let mut played = 0;
    loop {
        let outcome = player.play_frame(surface);
        played += 1;
        info!(
            frame = played,
            commands = outcome.commands,
            resume = outcome.resume_offset,
            "played frame"
        );
        after_frame(played, surface)?;

        if outcome.end_of_stream || limit.is_some_and(|limit| played >= limit) {
            return Ok(played);
        }
    }
}

/// Execute the view command
pub fn execute(args: ViewArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Canvas size must be non-zero (got {}x{})", args.width, args.height);
    }

    let mut player = Player::open(&args.input)
        .with_context(|| format!("Unable to open file {}", args.input.display()))?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("ppm"));

    let mut viewer = Viewer {
        canvas: Canvas::new(args.width, args.height),
        delay: !args.no_delay,
    };

    let played = play_frames(&mut player, &mut viewer, args.frames, |frame, viewer| {
        if args.each_frame {
            let path = frame_path(&output, frame);
            viewer
                .canvas
                .save_ppm(&path)
                .with_context(|| format!("Unable to write {}", path.display()))?;
        }
        Ok(())
    })?;

    viewer
        .canvas
        .save_ppm(&output)
        .with_context(|| format!("Unable to write {}", output.display()))?;
    println!(
        "Played {} frame(s) of {} into {}.",
        played,
        args.input.display(),
        output.display()
    );
    Ok(())
}
