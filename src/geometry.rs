//! Sensor geometry.
//!
//! Pixel geometry and bit depth are fixed for a build. `SENSOR` is the only
//! geometry the CLI ever uses; smaller geometries exist so the pipeline can be
//! exercised on toy frames.

use anyhow::{anyhow, Result};

/// Build-time sensor width in pixels.
pub const SENSOR_WIDTH: usize = 2048;

/// Build-time sensor height in pixels.
pub const SENSOR_HEIGHT: usize = 1920;

/// Maximum sample value written into the raster header.
pub const MAX_VALUE: u16 = u16::MAX;

/// Bytes per stored sample.
pub const SAMPLE_BYTES: usize = std::mem::size_of::<u16>();

/// The CMOS sensor this tool is built for.
pub const SENSOR: Geometry = Geometry {
    width: SENSOR_WIDTH,
    height: SENSOR_HEIGHT,
};

/// Frame dimensions. Only `new` and `SENSOR` produce one, so every value is
/// non-empty and its byte count fits in `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    width: usize,
    height: usize,
}

impl Geometry {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("geometry must be non-empty, got {}x{}", width, height));
        }
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(SAMPLE_BYTES))
            .ok_or_else(|| anyhow!("geometry {}x{} overflows", width, height))?;
        Ok(Self { width, height })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Samples per frame.
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Bytes in one complete frame file.
    pub const fn frame_bytes(&self) -> usize {
        self.pixel_count() * SAMPLE_BYTES
    }
}

impl Default for Geometry {
    fn default() -> Self {
        SENSOR
    }
}
