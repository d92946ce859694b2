//! The decoded raster this codec reads from and writes back to.

use std::path::Path;
use crate::error::{Error, Result};
use crate::pixel::{Pixel, pixel3, pixel4};

pub const MAX_DIMENSION: usize = 65535;

/// A row-major grid of RGBA pixels, channel count fixed at 4 until alpha
/// detection (`Encoder::detect_alpha`) decides whether to carry it.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Pixel>, // always 4 channels here; alpha dropping happens later in the pipeline
}

impl Raster {
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self> {
        validate_dimensions(width, height)?;

        if pixels.len() != width * height {
            return Err(Error::invariant("pixel buffer length does not match width * height"));
        }

        Ok(Self { width, height, pixels })
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Pixel {
        &self.pixels[y * self.width + x]
    }

    /// True iff any pixel's alpha channel is not fully opaque (255).
    pub fn has_transparency(&self) -> bool {
        self.pixels.iter().any(|pixel| pixel[3] != 255)
    }

    /// Loads an image file (PNG, JPEG, ...) into an 8-bit RGBA raster via the
    /// `image` crate, the external raster-decoding collaborator this codec assumes exists.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path)?.into_rgba8();
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);

        let pixels = decoded.pixels()
            .map(|p| pixel4(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect();

        Raster::new(width, height, pixels)
    }

    /// Writes this raster back out as an image file via the `image` crate,
    /// inferring the format from `path`'s extension. Used for round-trip
    /// inspection of a decoded `.nya` file, not by the encoder itself.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buffer = image::RgbaImage::new(self.width as u32, self.height as u32);

        for y in 0 .. self.height {
            for x in 0 .. self.width {
                let pixel = self.get(x, y);
                buffer.put_pixel(x as u32, y as u32, image::Rgba([pixel[0], pixel[1], pixel[2], pixel[3]]));
            }
        }

        buffer.save(path)?;
        Ok(())
    }
}

pub fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::dimensions("width and height must be at least 1"));
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::dimensions(format!(
            "width and height must not exceed {}, got {}x{}", MAX_DIMENSION, width, height
        )));
    }

    Ok(())
}

/// Drops a raster's 4th channel, used once alpha is known to be constantly opaque.
pub fn drop_alpha(pixels: &[Pixel]) -> Vec<Pixel> {
    pixels.iter().map(|p| pixel3(p[0], p[1], p[2])).collect()
}
