//! Input reading and output sinks.
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::{MemorySink, OutputSink, Surface};
//!
//! let mut sink = MemorySink::default();
//! sink.write(Surface::Realtime, "return M\n").unwrap();
//! assert_eq!(sink.content(Surface::Realtime), Some("return M\n"));
//! ```

use crate::pipeline::Surface;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use stubgen_core::{Error, Result};
use tracing::debug;

/// Reads an input document.
///
/// # Errors
///
/// Returns [`Error::InputUnreadable`] if the file cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|source| Error::InputUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Read input document");
    Ok(text)
}

/// Destination for generated text.
pub trait OutputSink {
    /// Persists the generated text of `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputFailed`] if the text cannot be written.
    fn write(&mut self, surface: Surface, content: &str) -> Result<()>;
}

/// Writes generated text to a file, creating parent directories.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, surface: Surface, content: &str) -> Result<()> {
        let failed = |source| Error::OutputFailed {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(failed)?;
        }
        fs::write(&self.path, content).map_err(failed)?;
        debug!(surface = %surface, path = %self.path.display(), "Wrote output");
        Ok(())
    }
}

/// Writes generated text to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, _surface: Surface, content: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| Error::OutputFailed {
                path: "<stdout>".to_string(),
                source,
            })
    }
}

/// Keeps generated text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    outputs: Vec<(Surface, String)>,
}

impl MemorySink {
    /// Returns the last text written for `surface`.
    #[must_use]
    pub fn content(&self, surface: Surface) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(written, _)| *written == surface)
            .map(|(_, content)| content.as_str())
    }

    /// Number of writes received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, surface: Surface, content: &str) -> Result<()> {
        self.outputs.push((surface, content.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_document() {
        let err = read_document(Path::new("/nonexistent/realtime.proto")).unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("/nonexistent/realtime.proto"));
    }

    #[test]
    fn test_file_sink_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nakama").join("socket.lua");
        let mut sink = FileSink::new(&path);
        sink.write(Surface::Realtime, "return M\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "return M\n");
    }

    #[test]
    fn test_file_sink_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let mut sink = FileSink::new(blocker.join("socket.lua"));
        let err = sink.write(Surface::Realtime, "x").unwrap_err();
        assert!(matches!(err, Error::OutputFailed { .. }));
    }

    #[test]
    fn test_memory_sink_keeps_last_write() {
        let mut sink = MemorySink::default();
        assert!(sink.is_empty());
        sink.write(Surface::Rest, "a").unwrap();
        sink.write(Surface::Rest, "b").unwrap();
        assert_eq!(sink.content(Surface::Rest), Some("b"));
        assert_eq!(sink.content(Surface::Realtime), None);
        assert_eq!(sink.len(), 2);
    }
}
