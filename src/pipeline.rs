//! Scan, fold, emit.
//!
//! A run owns exactly two frame-sized buffers: the source's read buffer and the
//! accumulator. Candidates are read and folded one at a time.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::accumulator::Accumulator;
use crate::geometry::{Geometry, SENSOR};
use crate::raster::{self, OutputFormat};
use crate::source::{FrameRead, FrameSource};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct QuicklookRun {
    pub input_dir: PathBuf,
    /// Dark frame for subtraction. Carried through the run but never read.
    pub darkframe: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub geometry: Geometry,
    pub report_path: Option<PathBuf>,
}

impl QuicklookRun {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        darkframe: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            darkframe: darkframe.into(),
            output: output.into(),
            format: OutputFormat::default(),
            geometry: SENSOR,
            report_path: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_report(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }
}

/// Counters reported once the output is written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Frames folded into the mean.
    pub accepted: u64,
    /// Candidates skipped because they were too short.
    pub rejected_size: u64,
    /// Candidates opened.
    pub candidates: u64,
    /// False when the input directory could not be listed.
    pub directory_found: bool,
    pub output: PathBuf,
    pub format: OutputFormat,
}

/// Fold every frame under `run.input_dir` and write the mean.
///
/// An unlistable input directory is not an error: the run still writes an
/// all-zero mean. A candidate that cannot be opened, or an unwritable output,
/// ends the run with `Err`.
pub fn run(run: &QuicklookRun) -> Result<RunSummary> {
    let (acc, summary) = accumulate(run)?;
    finish(run, &acc, summary)
}

/// Scan and fold without writing anything.
pub fn accumulate(run: &QuicklookRun) -> Result<(Accumulator, RunSummary)> {
    println!("searching under {}", run.input_dir.display());
    println!("saving to {}", run.output.display());
    log::debug!(
        "dark frame {} accepted, subtraction not applied",
        run.darkframe.display()
    );

    let mut acc = Accumulator::new(run.geometry);
    let mut summary = RunSummary {
        output: run.output.clone(),
        format: run.format,
        ..RunSummary::default()
    };

    let mut source = match FrameSource::scan(&run.input_dir, run.geometry) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("{}", e);
            println!("> found nothing under {}.", run.input_dir.display());
            return Ok((acc, summary));
        }
    };
    summary.directory_found = true;

    while let Some(read) = source.next_frame()? {
        match read {
            FrameRead::Accepted { path, frame } => {
                acc.fold(&frame);
                log::debug!("folded {} (count {})", path.display(), acc.count());
            }
            FrameRead::Rejected { path, .. } => {
                log::debug!("skipped {}", path.display());
            }
        }
    }

    let stats = source.stats();
    summary.accepted = acc.count();
    summary.rejected_size = stats.rejected_size;
    summary.candidates = stats.candidates;
    log::info!(
        "{}: {} candidates, {} folded, {} wrong size",
        source.dir().display(),
        summary.candidates,
        summary.accepted,
        summary.rejected_size
    );
    Ok((acc, summary))
}

/// Write the mean, print the summary, and write the JSON report if one is configured.
pub fn finish(run: &QuicklookRun, acc: &Accumulator, summary: RunSummary) -> Result<RunSummary> {
    raster::emit(&run.output, run.format, acc)?;
    println!("> saved average output to {}", run.output.display());
    println!(
        "> found {} files with wrong length out of {}",
        summary.rejected_size, summary.accepted
    );

    if let Some(path) = &run.report_path {
        write_report(path, &summary)?;
        log::info!("run summary written to {}", path.display());
    }
    Ok(summary)
}

fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_vec_pretty(summary)?;
    std::fs::write(path, json)
        .map_err(|e| anyhow!("failed to write report {}: {}", path.display(), e))
}
