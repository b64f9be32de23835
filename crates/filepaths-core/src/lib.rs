//! Core types for filepaths.
//!
//! This crate provides the configuration, error and report types shared by
//! the scanner and the command-line front end.

mod config;
mod error;
mod report;

pub use config::{
    DEFAULT_EXCLUDED, ErrorPolicy, ExcludedNames, ScanConfig, ScanConfigBuilder,
    ScanConfigBuilderError, output_file_name,
};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use report::{RootFailure, RootOutcome, RootReport, RunReport};
