use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Upper bound on pre-rendered page HTML accepted from a file or stdin.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Reads pre-rendered page HTML.
pub struct InputReader;

impl InputReader {
    /// Reads `path`, or stdin when `None`.
    pub fn read(path: Option<&Path>) -> Result<String> {
        path.map_or_else(|| Self::read_from(io::stdin().lock()), Self::read_file)
    }

    fn read_file(path: &Path) -> Result<String> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to access file: {}", path.display()))?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > MAX_INPUT_SIZE {
            bail!(too_large(size));
        }

        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Reads at most one byte past the limit so oversized input is rejected
    /// without buffering it.
    fn read_from(reader: impl Read) -> Result<String> {
        let mut buffer = Vec::new();
        reader
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;

        if buffer.len() > MAX_INPUT_SIZE {
            bail!(too_large(buffer.len()));
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

fn too_large(size: usize) -> String {
    format!(
        "Input size ({:.1} MB) exceeds maximum allowed size (1 MB)",
        size as f64 / 1024.0 / 1024.0
    )
}
