// Rendered page output.
// Publishes the page HTML after each update cycle.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Destination for the rendered page.
pub trait PageSink: Send + Sync {
    fn publish(&self, html: &str) -> Result<()>;
}

/// Writes the page to a file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSink for FileSink {
    fn publish(&self, html: &str) -> Result<()> {
        write_atomic(&self.path, html)
    }
}

/// Writes the page to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl PageSink for StdoutSink {
    fn publish(&self, html: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Write text via a temp file and rename, so readers never see a partial page.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
