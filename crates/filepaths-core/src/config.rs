//! Listing configuration types.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Directory names skipped when nothing else is configured.
pub const DEFAULT_EXCLUDED: &[&str] =
    &["node_modules", ".angular", ".git", ".vscode", "android", "dist"];

/// Build the output file name for a root label.
pub fn output_file_name(label: &str) -> String {
    format!("file_paths_{label}.txt")
}

/// What to do when a directory cannot be read mid-walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record a warning and keep walking.
    #[default]
    Skip,
    /// Stop the current root.
    Abort,
}

impl ErrorPolicy {
    pub fn is_abort(self) -> bool {
        self == Self::Abort
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown error policy '{other}' (expected 'skip' or 'abort')")),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

/// Set of directory base names pruned during traversal.
///
/// Matching is exact and case-sensitive. Names that are not valid UTF-8
/// never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludedNames(BTreeSet<String>);

impl ExcludedNames {
    /// An empty set, which disables pruning.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Check a directory entry name against the set.
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.0.contains(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExcludedNames {
    fn default() -> Self {
        DEFAULT_EXCLUDED.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for ExcludedNames {
    fn from(names: Vec<S>) -> Self {
        names.into_iter().collect()
    }
}

/// Configuration for a listing run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Label to root directory, processed in insertion order.
    #[builder(default)]
    pub roots: IndexMap<String, PathBuf>,

    /// Directory names pruned at every depth.
    #[builder(default)]
    #[serde(rename = "excluded")]
    pub excluded_names: ExcludedNames,

    /// Directory the output files are written to.
    #[builder(default = "PathBuf::from(\".\")")]
    pub output_dir: PathBuf,

    /// Follow symbolic links to directories.
    #[builder(default = "false")]
    pub follow_symlinks: bool,

    /// Policy for unreadable directories.
    #[builder(default)]
    pub on_error: ErrorPolicy,
}

impl ScanConfigBuilder {
    /// Append a single labeled root.
    pub fn root(&mut self, label: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.roots
            .get_or_insert_with(IndexMap::new)
            .insert(label.into(), path.into());
        self
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(ref roots) = self.roots {
            validate_roots(roots)?;
        }
        Ok(())
    }
}

fn validate_roots(roots: &IndexMap<String, PathBuf>) -> Result<(), String> {
    for (label, path) in roots {
        if label.is_empty() {
            return Err("Root label cannot be empty".to_string());
        }
        if label == "." || label == ".." || label.contains(['/', '\\']) {
            return Err(format!("Root label '{label}' cannot be used in a file name"));
        }
        if path.as_os_str().is_empty() {
            return Err(format!("Root path for '{label}' cannot be empty"));
        }
    }
    Ok(())
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Config with no roots and the default excluded names.
    pub fn new() -> Self {
        Self {
            roots: IndexMap::new(),
            excluded_names: ExcludedNames::default(),
            output_dir: PathBuf::from("."),
            follow_symlinks: false,
            on_error: ErrorPolicy::Skip,
        }
    }

    /// Add a labeled root.
    pub fn with_root(mut self, label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.roots.insert(label.into(), path.into());
        self
    }

    /// Replace the excluded names.
    pub fn with_excluded(mut self, names: impl Into<ExcludedNames>) -> Self {
        self.excluded_names = names.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Check if a directory name is pruned.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.contains(name)
    }

    /// Path of the output file for a label.
    pub fn output_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(output_file_name(label))
    }

    /// Check the config before any root is processed.
    pub fn validate(&self) -> Result<(), ScanError> {
        validate_roots(&self.roots).map_err(ScanError::invalid_config)
    }

    /// Parse a TOML config document.
    pub fn from_toml_str(content: &str) -> Result<Self, ScanError> {
        let config: Self = toml::from_str(content).map_err(|e| ScanError::ConfigParse {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ScanError::ConfigParse { message, .. } => ScanError::ConfigParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("IVF", "/data/ivf")
            .root("docs", "/data/docs")
            .follow_symlinks(true)
            .build()
            .unwrap();

        let labels: Vec<_> = config.roots.keys().map(String::as_str).collect();
        assert_eq!(labels, ["IVF", "docs"]);
        assert_eq!(config.roots["IVF"], PathBuf::from("/data/ivf"));
        assert!(config.follow_symlinks);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn test_config_simple() {
        let config = ScanConfig::new();
        assert!(config.roots.is_empty());
        assert!(!config.follow_symlinks);
        assert!(config.is_excluded("node_modules"));
        assert!(config.is_excluded(".git"));
        assert!(!config.is_excluded("src"));
    }

    #[test]
    fn test_builder_rejects_bad_labels() {
        assert!(ScanConfig::builder().root("", "/data").build().is_err());
        assert!(ScanConfig::builder().root("a/b", "/data").build().is_err());
        assert!(ScanConfig::builder().root("..", "/data").build().is_err());
        assert!(ScanConfig::builder().root("ok", "").build().is_err());
    }

    #[test]
    fn test_exclusion_is_exact_and_case_sensitive() {
        let names = ExcludedNames::from(vec!["node_modules"]);
        assert!(names.is_excluded(OsStr::new("node_modules")));
        assert!(!names.is_excluded(OsStr::new("Node_Modules")));
        assert!(!names.is_excluded(OsStr::new("node_modules_old")));
        assert!(!ExcludedNames::empty().is_excluded(OsStr::new("node_modules")));
    }

    #[test]
    fn test_output_path() {
        let config = ScanConfig::new().with_output_dir("/tmp/out");
        assert_eq!(
            config.output_path("IVF"),
            PathBuf::from("/tmp/out/file_paths_IVF.txt")
        );
        assert_eq!(output_file_name("x"), "file_paths_x.txt");
    }

    #[test]
    fn test_error_policy_parse() {
        assert_eq!("skip".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Skip);
        assert_eq!("ABORT".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Abort);
        assert!("retry".parse::<ErrorPolicy>().is_err());
        assert!(ErrorPolicy::Abort.is_abort());
    }

    #[test]
    fn test_from_toml() {
        let config = ScanConfig::from_toml_str(
            r#"
            on_error = "abort"
            excluded = ["target"]

            [roots]
            IVF = "/data/ivf"
            "#,
        )
        .unwrap();

        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert!(config.is_excluded("target"));
        assert!(!config.is_excluded("node_modules"));
        assert_eq!(config.roots["IVF"], PathBuf::from("/data/ivf"));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_from_toml_defaults_and_unknown_keys() {
        let config = ScanConfig::from_toml_str("").unwrap();
        assert!(config.roots.is_empty());
        assert_eq!(config.excluded_names, ExcludedNames::default());

        assert!(matches!(
            ScanConfig::from_toml_str("exclude = [\"x\"]"),
            Err(ScanError::ConfigParse { .. })
        ));
        assert!(matches!(
            ScanConfig::from_toml_str("[roots]\n\"a/b\" = \"/x\""),
            Err(ScanError::InvalidConfig { .. })
        ));
    }
}
