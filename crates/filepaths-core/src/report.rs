//! Per-root and per-run results.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::{ScanWarning, WarningKind};

/// Result of listing a single root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootReport {
    /// Root label.
    pub label: CompactString,
    /// Directory that was walked.
    pub root: PathBuf,
    /// File the paths were written to.
    pub output_file: PathBuf,
    /// Number of lines written.
    pub paths_written: u64,
    /// Number of excluded directories skipped.
    pub dirs_pruned: u64,
    /// Bytes written to the output file.
    pub bytes_written: u64,
    /// Non-fatal problems hit during the walk.
    pub warnings: Vec<ScanWarning>,
    /// When the walk started.
    pub started_at: DateTime<Utc>,
    /// How long the root took.
    pub elapsed: Duration,
}

impl RootReport {
    /// True when the root was missing or not a directory.
    pub fn root_unavailable(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.kind == WarningKind::RootUnavailable)
    }
}

/// A root that could not be completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootFailure {
    pub label: CompactString,
    pub root: PathBuf,
    pub output_file: PathBuf,
    pub error: String,
}

/// Outcome of a single root, as seen by run observers.
#[derive(Debug, Clone)]
pub enum RootOutcome {
    Completed(RootReport),
    Failed(RootFailure),
}

/// Result of a whole run, in root order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub completed: Vec<RootReport>,
    pub failed: Vec<RootFailure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a root outcome.
    pub fn push(&mut self, outcome: RootOutcome) {
        match outcome {
            RootOutcome::Completed(report) => self.completed.push(report),
            RootOutcome::Failed(failure) => self.failed.push(failure),
        }
    }

    /// True when every root completed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_paths(&self) -> u64 {
        self.completed.iter().map(|r| r.paths_written).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.completed.iter().map(|r| r.warnings.len()).sum()
    }
}
