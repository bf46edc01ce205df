//! Directory frame source.
//!
//! `FrameSource` walks one directory (non-recursive) and reads every candidate
//! file into a single reusable `FrameBuffer`. Candidates are chosen by name
//! only: the name must carry a non-empty extension and contain `QL`.
//!
//! Outcomes per candidate:
//! - full frame read: `FrameRead::Accepted`
//! - fewer samples than the geometry needs: `FrameRead::Rejected` (counted, not an error)
//! - file cannot be opened: `Err`, which ends the run
//!
//! Enumeration order is whatever the platform's directory listing yields.

use anyhow::{anyhow, Result};
use std::fs::{File, ReadDir};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::frame::{Frame, FrameBuffer, FrameFill};
use crate::geometry::Geometry;

/// Substring that marks a quicklook frame file.
pub const CANDIDATE_MARKER: &str = "QL";

/// True if `name` has a dot that is neither its first nor its last character.
///
/// Only the first dot is considered, so `a.b.` still qualifies through `a.`.
pub fn has_extension(name: &str) -> bool {
    match name.find('.') {
        Some(0) | None => false,
        Some(dot) => dot + 1 < name.len(),
    }
}

/// True if `name` should be read as a frame.
pub fn is_candidate(name: &str) -> bool {
    has_extension(name) && name.contains(CANDIDATE_MARKER)
}

/// Result of reading one candidate.
#[derive(Debug)]
pub enum FrameRead<'a> {
    Accepted { path: PathBuf, frame: Frame<'a> },
    Rejected { path: PathBuf, samples_read: usize },
}

/// Counters kept while scanning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub candidates: u64,
    pub rejected_size: u64,
}

/// Lazy scan over one directory.
pub struct FrameSource {
    dir: PathBuf,
    entries: ReadDir,
    buffer: FrameBuffer,
    stats: SourceStats,
}

impl FrameSource {
    /// Open `dir` for scanning. Fails if the directory cannot be listed.
    pub fn scan(dir: impl AsRef<Path>, geometry: Geometry) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow!("failed to open directory {}: {}", dir.display(), e))?;
        Ok(Self {
            dir,
            entries,
            buffer: FrameBuffer::new(geometry),
            stats: SourceStats::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stats(&self) -> SourceStats {
        self.stats
    }

    /// Read the next candidate. `Ok(None)` once the listing is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<FrameRead<'_>>> {
        let Some(path) = self.next_candidate() else {
            return Ok(None);
        };
        self.stats.candidates += 1;

        let file = File::open(&path)
            .map_err(|e| anyhow!("error opening file {}: {}", path.display(), e))?;
        log::info!("reading {}", path.display());

        let expected = self.buffer.geometry().pixel_count();
        match self.buffer.read_from(BufReader::new(file)) {
            FrameFill::Complete(frame) => Ok(Some(FrameRead::Accepted { path, frame })),
            FrameFill::Short { samples_read } => {
                self.stats.rejected_size += 1;
                log::warn!(
                    "{}: wrong size ({} of {} samples), continuing",
                    path.display(),
                    samples_read,
                    expected
                );
                Ok(Some(FrameRead::Rejected { path, samples_read }))
            }
        }
    }

    fn next_candidate(&mut self) -> Option<PathBuf> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let name = entry.file_name();
            if is_candidate(&name.to_string_lossy()) {
                return Some(entry.path());
            }
        }
        None
    }
}
