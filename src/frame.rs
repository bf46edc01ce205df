//! Raw frame decoding.
//!
//! - `FrameBuffer`: the single reusable read buffer. One frame's worth of bytes,
//!   allocated once per run and refilled for every candidate.
//! - `Frame`: immutable view of a completely filled buffer. Samples are decoded
//!   on access, so no second copy of the capture is ever made.
//!
//! Samples are unsigned 16-bit little-endian values in storage order.

use anyhow::{anyhow, Result};
use std::io::{ErrorKind, Read};

use crate::geometry::{Geometry, SAMPLE_BYTES};

// ----------------------------------------------------------------------------
// Frame: one complete capture
// ----------------------------------------------------------------------------

/// One raw capture, borrowed from the `FrameBuffer` that read it.
///
/// There is no mutable access; a frame is read once, folded, and then the
/// buffer is reused for the next candidate.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    geometry: Geometry,
    bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn len(&self) -> usize {
        self.geometry.pixel_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at storage index `index`, or `None` past the end.
    pub fn sample(&self, index: usize) -> Option<u16> {
        let start = index.checked_mul(SAMPLE_BYTES)?;
        let pair = self.bytes.get(start..)?.get(..SAMPLE_BYTES)?;
        Some(u16::from_le_bytes([pair[0], pair[1]]))
    }

    /// All samples in storage order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = u16> + 'a {
        self.bytes
            .chunks_exact(SAMPLE_BYTES)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}

/// Outcome of filling the buffer from one stream.
#[derive(Debug)]
pub enum FrameFill<'a> {
    /// Exactly one frame's worth of samples was read.
    Complete(Frame<'a>),
    /// The stream ended (or failed) before a full frame was read.
    Short { samples_read: usize },
}

// ----------------------------------------------------------------------------
// FrameBuffer: reusable input buffer
// ----------------------------------------------------------------------------

/// Fixed-size input buffer, sized from the geometry at construction.
pub struct FrameBuffer {
    geometry: Geometry,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            bytes: vec![0u8; geometry.frame_bytes()],
        }
    }

    /// Buffer pre-filled with `samples`. The sample count must match the geometry.
    pub fn from_samples(geometry: Geometry, samples: &[u16]) -> Result<Self> {
        if samples.len() != geometry.pixel_count() {
            return Err(anyhow!(
                "expected {} samples for {}x{}, got {}",
                geometry.pixel_count(),
                geometry.width(),
                geometry.height(),
                samples.len()
            ));
        }
        let bytes = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Ok(Self { geometry, bytes })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// View of the current contents as a frame.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            geometry: self.geometry,
            bytes: &self.bytes,
        }
    }

    /// Read up to one frame from `reader`.
    ///
    /// Reads stop at exactly one frame's worth of bytes; anything after that in
    /// the stream is left unread. A read error ends the fill the same way end
    /// of stream does. A trailing odd byte does not count as a sample.
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> FrameFill<'_> {
        let mut filled = 0usize;
        while filled < self.bytes.len() {
            match reader.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("read stopped after {} bytes: {}", filled, e);
                    break;
                }
            }
        }

        if filled == self.bytes.len() {
            FrameFill::Complete(self.frame())
        } else {
            FrameFill::Short {
                samples_read: filled / SAMPLE_BYTES,
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
