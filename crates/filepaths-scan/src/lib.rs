//! Directory walking and path-list writing for filepaths.
//!
//! # Overview
//!
//! `filepaths-scan` walks each configured root top-down on the calling
//! thread, drops excluded directories before descending into them, and
//! writes every file path it meets to `file_paths_<label>.txt`.
//!
//! # Example
//!
//! ```rust,no_run
//! use filepaths_scan::{Generator, ScanConfig};
//!
//! let config = ScanConfig::new().with_root("IVF", "/data/ivf");
//! let generator = Generator::new(config).unwrap();
//! let report = generator.run();
//!
//! for root in &report.completed {
//!     println!("{} paths -> {}", root.paths_written, root.output_file.display());
//! }
//! ```

mod generator;
mod walker;
mod writer;

pub use generator::Generator;
pub use walker::{PathWalker, WalkSummary};
pub use writer::PathListWriter;

// Re-export core types for convenience
pub use filepaths_core::{
    ErrorPolicy, ExcludedNames, RootFailure, RootOutcome, RootReport, RunReport, ScanConfig,
    ScanError, ScanWarning, WarningKind,
};
