//! Output writers for the final mean.
//!
//! `pgm` is the quicklook raster: plain (ASCII) PGM with a fixed header and one
//! right-justified 6-column field per pixel. Output row `r`, column `c` takes
//! storage index `r + c * height`, i.e. storage is read column-major. Downstream
//! quicklook tooling depends on this orientation.
//!
//! `raw` dumps the mean in storage order as little-endian samples, which makes
//! the output itself a readable frame.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::accumulator::Accumulator;
use crate::geometry::{Geometry, MAX_VALUE};

pub const PGM_MAGIC: &str = "P2";
pub const PGM_COMMENT: &str = "# CMOS PGM writer for quicklook";

/// Width of one pixel field in the PGM body.
pub const FIELD_WIDTH: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pgm,
    Raw,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pgm" => Ok(Self::Pgm),
            "raw" | "ql" => Ok(Self::Raw),
            other => Err(anyhow!("unknown output format '{}' (expected pgm or raw)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pgm => f.write_str("pgm"),
            Self::Raw => f.write_str("raw"),
        }
    }
}

/// Storage index of output row `row`, column `col`.
pub fn transposed_index(geometry: Geometry, row: usize, col: usize) -> usize {
    row + col * geometry.height()
}

/// Write `pixels` as an ASCII PGM raster.
pub fn write_pgm<W: Write>(mut out: W, geometry: Geometry, pixels: &[u16]) -> Result<()> {
    check_len(geometry, pixels)?;
    writeln!(out, "{}", PGM_MAGIC)?;
    writeln!(out, "{}", PGM_COMMENT)?;
    writeln!(out, "{} {}", geometry.width(), geometry.height())?;
    writeln!(out, "{}", MAX_VALUE)?;
    for row in 0..geometry.height() {
        for col in 0..geometry.width() {
            let value = pixels[transposed_index(geometry, row, col)];
            write!(out, "{:>width$}", value, width = FIELD_WIDTH)?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Write `pixels` as raw little-endian samples in storage order.
pub fn write_raw<W: Write>(mut out: W, geometry: Geometry, pixels: &[u16]) -> Result<()> {
    check_len(geometry, pixels)?;
    for value in pixels {
        out.write_all(&value.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Create `path` and write the accumulator in `format`.
///
/// There is no temp-file dance; a failure mid-write leaves a partial file.
pub fn emit(path: &Path, format: OutputFormat, acc: &Accumulator) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| anyhow!("failed to open output {}: {}", path.display(), e))?;
    let out = BufWriter::new(file);
    let written = match format {
        OutputFormat::Pgm => write_pgm(out, acc.geometry(), acc.pixels()),
        OutputFormat::Raw => write_raw(out, acc.geometry(), acc.pixels()),
    };
    written.map_err(|e| anyhow!("failed to write output {}: {}", path.display(), e))
}

fn check_len(geometry: Geometry, pixels: &[u16]) -> Result<()> {
    if pixels.len() != geometry.pixel_count() {
        return Err(anyhow!(
            "raster {}x{} needs {} pixels, got {}",
            geometry.width(),
            geometry.height(),
            geometry.pixel_count(),
            pixels.len()
        ));
    }
    Ok(())
}
