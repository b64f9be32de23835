//! Line-per-path output file sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use filepaths_core::{ScanError, ScanWarning};

/// Buffered writer for one `file_paths_<label>.txt` file.
///
/// The file is truncated on creation. Call [`PathListWriter::finish`] to
/// flush; dropping the writer flushes on a best-effort basis only.
#[derive(Debug)]
pub struct PathListWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    lines: u64,
    bytes: u64,
}

impl PathListWriter {
    /// Create or truncate the output file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| ScanError::io(&path, e))?;
        Ok(Self {
            path,
            inner: BufWriter::new(file),
            lines: 0,
            bytes: 0,
        })
    }

    /// Append one path as a UTF-8 line.
    ///
    /// Paths that are not valid UTF-8 are written with replacement
    /// characters and reported back as a warning.
    pub fn write_path(&mut self, path: &Path) -> Result<Option<ScanWarning>, ScanError> {
        let (line, warning) = match path.to_str() {
            Some(s) => (std::borrow::Cow::Borrowed(s), None),
            None => (path.to_string_lossy(), Some(ScanWarning::non_utf8(path))),
        };

        self.write_line(&line)?;
        Ok(warning)
    }

    fn write_line(&mut self, line: &str) -> Result<(), ScanError> {
        self.inner
            .write_all(line.as_bytes())
            .and_then(|()| self.inner.write_all(b"\n"))
            .map_err(|e| ScanError::io(&self.path, e))?;
        self.lines += 1;
        self.bytes += line.len() as u64 + 1;
        Ok(())
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and close, returning `(lines, bytes)` written.
    pub fn finish(mut self) -> Result<(u64, u64), ScanError> {
        self.inner.flush().map_err(|e| ScanError::io(&self.path, e))?;
        Ok((self.lines, self.bytes))
    }
}
