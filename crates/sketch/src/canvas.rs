//! Software drawing surface.
//!
//! [`Canvas`] rasterises playback into an RGB image, one pen unit per
//! pixel. Drawing outside the canvas is clipped.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::decoder::Surface;
use crate::error::PgmError;

pub const DEFAULT_WIDTH: u32 = 200;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Initial drawing colour: opaque white.
const DEFAULT_COLOUR: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    colour: u32,
    presents: usize,
    paused_millis: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Canvas {
    /// Creates a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            colour: DEFAULT_COLOUR,
            presents: 0,
            paused_millis: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Packed RGB bytes, row-major.
    pub fn as_slice(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// RGB value at (`x`, `y`), if inside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Current drawing colour as `0xRRGGBBAA`.
    pub fn colour(&self) -> u32 {
        self.colour
    }

    /// Number of `present` calls so far.
    pub fn present_count(&self) -> usize {
        self.presents
    }

    /// Sum of all pause durations requested so far.
    pub fn paused_millis(&self) -> u64 {
        self.paused_millis
    }

    /// Writes the canvas as a binary PPM (`P6`) image.
    pub fn write_ppm<W: Write>(&self, writer: W) -> Result<(), PgmError> {
        PnmEncoder::new(writer)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgb8,
            )?;
        Ok(())
    }

    /// Saves the canvas to `path` as a binary PPM image.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<(), PgmError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn rgb(&self) -> Rgb<u8> {
        let [r, g, b, _alpha] = self.colour.to_be_bytes();
        Rgb([r, g, b])
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let rgb = self.rgb();
        self.image.put_pixel(x as u32, y as u32, rgb);
    }

    /// Clips a segment to the pixel grid (Liang-Barsky). Returns `None` when
    /// no part of it is visible. End points already inside are kept exact.
    fn clip_line(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Option<(i64, i64, i64, i64)> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }
        let x_max = f64::from(self.width() - 1);
        let y_max = f64::from(self.height() - 1);
        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [(-dx, fx), (dx, x_max - fx), (-dy, fy), (dy, y_max - fy)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| ((fx + t * dx).round() as i64, (fy + t * dy).round() as i64);
        let (ax, ay) = if t0 > 0.0 { at(t0) } else { (x0, y0) };
        let (bx, by) = if t1 < 1.0 { at(t1) } else { (x1, y1) };
        Some((ax, ay, bx, by))
    }
}

impl Surface for Canvas {
    /// Bresenham line, both end points included, clipped to the canvas
    /// before rasterising.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let Some((mut x, mut y, x1, y1)) = self.clip_line(
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
        ) else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_block(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let (x, y) = (i64::from(x), i64::from(y));
        let (x1, y1) = (x + i64::from(width), y + i64::from(height));
        let (left, right) = (x.min(x1).max(0), x.max(x1).min(i64::from(self.width())));
        let (top, bottom) = (y.min(y1).max(0), y.max(y1).min(i64::from(self.height())));
        for row in top..bottom {
            for col in left..right {
                self.plot(col, row);
            }
        }
    }

    /// Takes the top three bytes of `rgba` as red, green and blue.
    ///
    /// Streams made by the encoder append a fixed `63, 3` DATA tail to each
    /// colour, which shifts it twelve bits left in the accumulator, so a
    /// converted grey-map renders with shifted colours (grey 128 comes out
    /// as `[8, 8, 15]`).
    fn set_colour(&mut self, rgba: u32) {
        self.colour = rgba;
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn pause(&mut self, millis: u32) {
        self.paused_millis += u64::from(millis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFF00_00FF;
    const WHITE: Option<[u8; 3]> = Some([255, 255, 255]);
    const BLACK: Option<[u8; 3]> = Some([0, 0, 0]);

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::default();
        assert_eq!(
            canvas.as_slice().len(),
            (DEFAULT_WIDTH * DEFAULT_HEIGHT * 3) as usize
        );
        assert!(canvas.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_horizontal_line_includes_ends() {
        let mut canvas = Canvas::new(5, 1);
        canvas.set_colour(RED);
        canvas.draw_line(1, 0, 3, 0);

        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(1, 0), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(3, 0), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(4, 0), BLACK);
    }

    #[test]
    fn test_zero_length_line_plots_point() {
        let mut canvas = Canvas::new(3, 3);
        canvas.draw_line(1, 1, 1, 1);
        assert_eq!(canvas.pixel(1, 1), WHITE);
    }

    #[test]
    fn test_diagonal_line() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_line(3, 3, 0, 0);
        for i in 0..4 {
            assert_eq!(canvas.pixel(i, i), WHITE);
        }
        assert_eq!(canvas.pixel(1, 0), BLACK);
    }

    #[test]
    fn test_line_clipped() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_line(-5, 1, 5, 1);
        assert_eq!(canvas.pixel(0, 1), WHITE);
        assert_eq!(canvas.pixel(1, 1), WHITE);
        assert_eq!(canvas.pixel(0, 0), BLACK);
    }

    #[test]
    fn test_far_target_line_is_clipped_first() {
        // unclipped, this line would take i32::MAX steps
        let mut canvas = Canvas::new(200, 200);
        canvas.draw_line(0, 0, i32::MAX, 0);

        for x in 0..200 {
            assert_eq!(canvas.pixel(x, 0), WHITE);
        }
        assert_eq!(canvas.pixel(0, 1), BLACK);
    }

    #[test]
    fn test_far_diagonal_from_outside() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(9, 9), WHITE);
        assert_eq!(canvas.pixel(9, 0), BLACK);
    }

    #[test]
    fn test_line_outside_draws_nothing() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_line(-10, -10, -1, -5);
        canvas.draw_line(10, 0, 10, 3);
        assert!(canvas.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_block_with_negative_size() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_colour(RED);
        canvas.draw_block(3, 3, -2, -2);

        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(2, 2), Some([255, 0, 0]));
        assert_eq!(canvas.pixel(3, 3), BLACK);
    }

    #[test]
    fn test_empty_block_draws_nothing() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_block(0, 0, 0, 2);
        assert!(canvas.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_present_and_pause_bookkeeping() {
        let mut canvas = Canvas::new(1, 1);
        canvas.present();
        canvas.pause(40);
        canvas.pause(60);
        assert_eq!(canvas.present_count(), 1);
        assert_eq!(canvas.paused_millis(), 100);
    }

    #[test]
    fn test_write_ppm_decodes_back() {
        let mut canvas = Canvas::new(2, 3);
        canvas.set_colour(RED);
        canvas.draw_line(1, 2, 1, 2);

        let mut out = Vec::new();
        canvas.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6"));

        let decoded = image::load_from_memory_with_format(&out, image::ImageFormat::Pnm)
            .unwrap()
            .into_rgb8();
        assert_eq!(decoded.dimensions(), (2, 3));
        assert_eq!(decoded.as_raw(), canvas.as_slice());
    }
}
