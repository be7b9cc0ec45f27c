//! Netpbm grey-map input.
//!
//! Decoding is done by the `image` crate's PNM codec, so binary and plain
//! grey-maps, comments and 16-bit samples are all accepted. Every input is
//! converted to 8-bit luma before it reaches the encoder; colour pixmaps
//! are converted too.

use std::path::Path;

use image::{GrayImage, ImageFormat};

use crate::encoder::GreyGrid;
use crate::error::PgmError;

/// An 8-bit grey-scale image, the grid the encoder consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greymap {
    image: GrayImage,
}

impl Greymap {
    /// Creates a grey-map from row-major samples.
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self, PgmError> {
        let mismatch = PgmError::SizeMismatch {
            width,
            height,
            actual: samples.len(),
        };
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(mismatch);
        };
        GrayImage::from_raw(w, h, samples)
            .filter(|image| image.len() == width * height)
            .map(|image| Self { image })
            .ok_or(mismatch)
    }

    /// Creates a grey-map from equal-length rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, PgmError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut samples = Vec::with_capacity(width * rows.len());
        for row in rows {
            samples.extend_from_slice(row.as_ref());
        }
        Self::new(width, rows.len(), samples)
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Sample at (`row`, `col`), if inside the image.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.image.get_pixel(col as u32, row as u32).0[0])
    }

    /// One row of samples.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width();
        &self.as_slice()[start..start + self.width()]
    }

    /// All samples, row-major.
    pub fn as_slice(&self) -> &[u8] {
        self.image.as_raw()
    }
}

impl From<GrayImage> for Greymap {
    fn from(image: GrayImage) -> Self {
        Self { image }
    }
}

impl GreyGrid for Greymap {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn sample(&self, row: usize, col: usize) -> u8 {
        self.image.get_pixel(col as u32, row as u32).0[0]
    }
}

/// Decodes an in-memory Netpbm image as a grey-map.
pub fn parse_pgm(data: &[u8]) -> Result<Greymap, PgmError> {
    let image = image::load_from_memory_with_format(data, ImageFormat::Pnm)?;
    Ok(image.into_luma8().into())
}

/// Reads a grey-map file. The format is chosen from the file extension.
pub fn read_pgm(path: impl AsRef<Path>) -> Result<Greymap, PgmError> {
    let image = image::open(path)?;
    Ok(image.into_luma8().into())
}
