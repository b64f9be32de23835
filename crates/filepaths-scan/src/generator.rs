//! Root-by-root driver tying the walker to the output writer.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};

use filepaths_core::{
    RootFailure, RootOutcome, RootReport, RunReport, ScanConfig, ScanError, ScanWarning,
};

use crate::walker::PathWalker;
use crate::writer::PathListWriter;

/// Generates one path list per configured root.
#[derive(Debug, Clone)]
pub struct Generator {
    config: ScanConfig,
    walker: PathWalker,
}

impl Generator {
    /// Validate the config and prepare a generator.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let walker = PathWalker::new(&config);
        Ok(Self { config, walker })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Process every root in order.
    pub fn run(&self) -> RunReport {
        self.run_with(|_| {})
    }

    /// Process every root in order, calling `on_root` as each one finishes.
    ///
    /// A failing root does not stop the roots after it.
    pub fn run_with<F>(&self, mut on_root: F) -> RunReport
    where
        F: FnMut(&RootOutcome),
    {
        let mut run = RunReport::new();

        for (label, root) in &self.config.roots {
            let outcome = match self.generate(label, root) {
                Ok(report) => RootOutcome::Completed(report),
                Err(e) => {
                    error!(label = %label, error = %e, "root failed");
                    RootOutcome::Failed(RootFailure {
                        label: label.as_str().into(),
                        root: root.clone(),
                        output_file: self.config.output_path(label),
                        error: e.to_string(),
                    })
                }
            };
            on_root(&outcome);
            run.push(outcome);
        }

        run
    }

    /// List a single root into its output file.
    ///
    /// A missing root, or one that is not a directory, yields an empty file
    /// and a warning rather than an error.
    pub fn generate(&self, label: &str, root: &Path) -> Result<RootReport, ScanError> {
        let start = Instant::now();
        let started_at = Utc::now();

        std::fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| ScanError::io(&self.config.output_dir, e))?;
        let output_file = self.config.output_path(label);
        let mut writer = PathListWriter::create(&output_file)?;

        info!(
            label,
            root = %root.display(),
            output = %writer.path().display(),
            "listing root"
        );

        let mut warnings = Vec::new();
        let mut dirs_pruned = 0;

        if root.is_dir() {
            let walked = self.walker.walk(root, |path| {
                if let Some(warning) = writer.write_path(path)? {
                    warnings.push(warning);
                }
                Ok(())
            });

            match walked {
                Ok(summary) => {
                    dirs_pruned = summary.dirs_pruned;
                    warnings.extend(summary.warnings);
                }
                Err(e) => {
                    // Keep what was written so far
                    if let Err(flush_err) = writer.finish() {
                        warn!(label, error = %flush_err, "partial output may be incomplete");
                    }
                    return Err(e);
                }
            }
        } else {
            let warning = ScanWarning::root_unavailable(root);
            warn!(label, "{}", warning.message);
            warnings.push(warning);
        }

        let (paths_written, bytes_written) = writer.finish()?;

        info!(
            label,
            paths = paths_written,
            pruned = dirs_pruned,
            warnings = warnings.len(),
            "root complete"
        );

        Ok(RootReport {
            label: label.into(),
            root: root.to_path_buf(),
            output_file,
            paths_written,
            dirs_pruned,
            bytes_written,
            warnings,
            started_at,
            elapsed: start.elapsed(),
        })
    }
}
