//! CMOS quicklook
//!
//! Streaming per-pixel average of raw sensor frames.
//!
//! # Architecture
//!
//! One run is a single sequential pipeline:
//!
//! 1. **Frame source**: lists a directory, keeps names with an extension that
//!    contain `QL`, reads each into one reusable buffer.
//! 2. **Accumulator**: folds each complete frame into a truncating running mean.
//! 3. **Raster emitter**: writes the final mean once, as an ASCII PGM (or a raw
//!    frame).
//!
//! At most two frame-sized buffers are alive at any time, however many files
//! the directory holds.
//!
//! # Module Structure
//!
//! - `geometry`: build-time sensor dimensions
//! - `frame`: `Frame` and the reusable `FrameBuffer`
//! - `source`: candidate filtering and directory scan
//! - `accumulator`: the running mean
//! - `raster`: PGM and raw writers
//! - `pipeline`: composition and run summary
//! - `config`: file and environment settings

pub mod accumulator;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod source;

pub use accumulator::Accumulator;
pub use config::QuicklookConfig;
pub use frame::{Frame, FrameBuffer, FrameFill};
pub use geometry::{Geometry, MAX_VALUE, SENSOR, SENSOR_HEIGHT, SENSOR_WIDTH};
pub use pipeline::{accumulate, finish, run, QuicklookRun, RunSummary};
pub use raster::OutputFormat;
pub use source::{is_candidate, FrameRead, FrameSource, SourceStats};
