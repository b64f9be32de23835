//! Serial jwalk traversal that prunes excluded directories before descent.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use filepaths_core::{
    ErrorPolicy, ExcludedNames, ScanConfig, ScanError, ScanWarning, WarningKind,
};

/// Counts gathered while walking one root.
#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    /// Files handed to the visitor.
    pub files: u64,
    /// Excluded directories removed before descent.
    pub dirs_pruned: u64,
    /// Unreadable entries skipped under [`ErrorPolicy::Skip`].
    pub warnings: Vec<ScanWarning>,
}

/// Top-down directory walker.
///
/// Entries within a directory are visited sorted by name, and each
/// directory's subtree follows the directory itself, so the output order is
/// stable for an unchanged tree.
#[derive(Debug, Clone)]
pub struct PathWalker {
    excluded: Arc<ExcludedNames>,
    follow_symlinks: bool,
    on_error: ErrorPolicy,
}

impl PathWalker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            excluded: Arc::new(config.excluded_names.clone()),
            follow_symlinks: config.follow_symlinks,
            on_error: config.on_error,
        }
    }

    /// Walk `root`, calling `visit` with the full path of every file.
    ///
    /// A symlink counts as a file unless it points at a directory; broken
    /// links are included. Errors returned by `visit` stop the walk.
    pub fn walk<F>(&self, root: &Path, mut visit: F) -> Result<WalkSummary, ScanError>
    where
        F: FnMut(&Path) -> Result<(), ScanError>,
    {
        let pruned = Arc::new(AtomicU64::new(0));
        let excluded = Arc::clone(&self.excluded);
        let pruned_counter = Arc::clone(&pruned);

        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.follow_symlinks)
            .process_read_dir(move |depth, dir_path, _state, children| {
                // Called once with no depth for the root entry, which is never pruned
                if depth.is_none() {
                    return;
                }
                children.retain(|entry| match entry {
                    Ok(e) if e.file_type().is_dir() && excluded.is_excluded(e.file_name()) => {
                        debug!(
                            dir = %dir_path.display(),
                            name = ?e.file_name(),
                            "pruned excluded directory"
                        );
                        pruned_counter.fetch_add(1, Ordering::Relaxed);
                        false
                    }
                    _ => true,
                });
            });

        let mut summary = WalkSummary::default();

        for entry_result in walker {
            let mut entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    self.handle_error(&err, &mut summary.warnings)?;
                    continue;
                }
            };

            // Unreadable directories still come through as entries
            if let Some(err) = entry.read_children_error.take() {
                self.handle_error(&err, &mut summary.warnings)?;
            }

            // The root itself is yielded first
            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if file_type.is_symlink() && path.is_dir() {
                continue;
            }

            visit(&path)?;
            summary.files += 1;
        }

        summary.dirs_pruned = pruned.load(Ordering::Relaxed);
        Ok(summary)
    }

    fn handle_error(
        &self,
        err: &jwalk::Error,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<(), ScanError> {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();

        if self.on_error.is_abort() {
            return Err(ScanError::Walk {
                path,
                message: err.to_string(),
            });
        }

        let warning = match err.io_error() {
            Some(io) => ScanWarning::read_error(&path, io),
            None => ScanWarning::new(&path, err.to_string(), WarningKind::ReadError),
        };
        warn!(path = %path.display(), "{}", warning.message);
        warnings.push(warning);
        Ok(())
    }
}
