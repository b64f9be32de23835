//! filepaths - write every file path under a set of roots to text files.
//!
//! Usage:
//!   filepaths --root IVF=/data/ivf            List one root
//!   filepaths --config lists.toml             Use roots from a config file
//!   filepaths --root a=/x --exclude target    Add an excluded directory name
//!   filepaths --help                          Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use filepaths_core::{ErrorPolicy, ExcludedNames, RootOutcome, ScanConfig};
use filepaths_scan::Generator;

#[derive(Parser)]
#[command(
    name = "filepaths",
    version,
    about = "List every file under a set of root directories",
    long_about = "filepaths walks each configured root, skips excluded directory names \
                  at any depth, and writes one path per line to file_paths_<label>.txt.\n\n\
                  Roots come from --root flags or a TOML config file."
)]
struct Cli {
    /// Root to list, as LABEL=PATH (repeatable; replaces roots from the config file)
    #[arg(short, long = "root", value_name = "LABEL=PATH", value_parser = parse_root)]
    roots: Vec<(String, PathBuf)>,

    /// Directory name to skip (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    excludes: Vec<String>,

    /// Start from an empty excluded set instead of the configured one
    #[arg(long)]
    no_default_excludes: bool,

    /// Config file (defaults to <config dir>/filepaths/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write output files to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Follow symbolic links to directories
    #[arg(long)]
    follow_symlinks: bool,

    /// What to do when a directory cannot be read
    #[arg(long, value_name = "skip|abort")]
    on_error: Option<ErrorPolicy>,

    /// Output format for the run summary
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let generator = Generator::new(config).context("Invalid configuration")?;
    if generator.config().roots.is_empty() {
        tracing::warn!("no roots configured, nothing to do");
    }

    let report = generator.run_with(|outcome| print_outcome(outcome, cli.format));

    if let OutputFormat::Json = cli.format {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !report.is_success() {
        let labels: Vec<_> = report.failed.iter().map(|f| f.label.as_str()).collect();
        bail!(
            "{} of {} root(s) failed: {}",
            report.failed.len(),
            report.failed.len() + report.completed.len(),
            labels.join(", ")
        );
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge defaults, the config file and command-line flags.
fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                tracing::info!(path = %path.display(), "using config file");
                ScanConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => ScanConfig::new(),
        },
    };

    if !cli.roots.is_empty() {
        config.roots = cli.roots.iter().cloned().collect();
    }

    if cli.no_default_excludes {
        config.excluded_names = ExcludedNames::empty();
    }
    for name in &cli.excludes {
        config.excluded_names.insert(name.as_str());
    }

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    if let Some(policy) = cli.on_error {
        config.on_error = policy;
    }

    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("filepaths").join("config.toml"))
}

/// Parse a `LABEL=PATH` root argument.
fn parse_root(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((label, path)) if !label.is_empty() && !path.is_empty() => {
            Ok((label.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected LABEL=PATH, got '{s}'")),
    }
}

/// Report a finished root on the console.
fn print_outcome(outcome: &RootOutcome, format: OutputFormat) {
    let line = match outcome {
        RootOutcome::Completed(report) => {
            let mut line = format!(
                "[✓] File paths saved to {} ({} paths, {})",
                display_relative(&report.output_file),
                report.paths_written,
                format_size(report.bytes_written)
            );
            if !report.warnings.is_empty() {
                line.push_str(&format!(", {} warning(s)", report.warnings.len()));
            }
            line
        }
        RootOutcome::Failed(failure) => format!(
            "[✗] {} not written: {}",
            display_relative(&failure.output_file),
            failure.error
        ),
    };

    // Keep stdout clean for the JSON summary
    match format {
        OutputFormat::Text => println!("{line}"),
        OutputFormat::Json => eprintln!("{line}"),
    }
}

fn display_relative(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

/// Format a byte size for display.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        let (label, path) = parse_root("IVF=/data/ivf").unwrap();
        assert_eq!(label, "IVF");
        assert_eq!(path, PathBuf::from("/data/ivf"));

        // Only the first '=' separates
        let (label, path) = parse_root("x=/a=b").unwrap();
        assert_eq!(label, "x");
        assert_eq!(path, PathBuf::from("/a=b"));

        assert!(parse_root("/data/ivf").is_err());
        assert!(parse_root("=/data").is_err());
        assert!(parse_root("x=").is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "excluded = [\"dist\"]\n\n[roots]\nfromfile = \"/file/root\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "filepaths",
            "--config",
            path.to_str().unwrap(),
            "--root",
            "a=/one",
            "--root",
            "b=/two",
            "--exclude",
            "target",
            "--on-error",
            "abort",
        ]);
        let config = build_config(&cli).unwrap();

        let labels: Vec<_> = config.roots.keys().map(String::as_str).collect();
        assert_eq!(labels, ["a", "b"]);
        assert!(config.is_excluded("dist"));
        assert!(config.is_excluded("target"));
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn test_no_default_excludes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::parse_from([
            "filepaths",
            "--config",
            path.to_str().unwrap(),
            "--no-default-excludes",
            "-x",
            "build",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.excluded_names.iter().collect::<Vec<_>>(), ["build"]);
        assert!(!config.is_excluded("node_modules"));
    }
}
