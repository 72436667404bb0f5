//! Per-request scratch files.
//!
//! A [`ScratchFile`] holds a byte-for-byte copy of one submission so the
//! analyzer can read it from disk. Names are `<prefix><random>` and the file
//! is created exclusively, so concurrent requests never share one. The file
//! is removed when the handle is dropped, on every exit path of the request.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::consts::DEFAULT_SCRATCH_PREFIX;
use crate::error::RelayError;

/// Where scratch files go and how they are named.
#[derive(Debug, Clone)]
pub struct ScratchConfig {
    pub dir: PathBuf,
    pub prefix: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create a fresh scratch file and write `content` into it.
    pub async fn stage(config: &ScratchConfig, content: &str) -> Result<Self, RelayError> {
        let config = config.clone();
        let content = content.to_owned();
        tokio::task::spawn_blocking(move || Self::stage_blocking(&config, content.as_bytes()))
            .await
            .map_err(|e| RelayError::ScratchCreate(std::io::Error::other(e)))?
    }

    fn stage_blocking(config: &ScratchConfig, bytes: &[u8]) -> Result<Self, RelayError> {
        let mut file = tempfile::Builder::new()
            .prefix(&config.prefix)
            .tempfile_in(&config.dir)
            .map_err(RelayError::ScratchCreate)?;

        file.write_all(bytes).map_err(RelayError::ScratchWrite)?;
        file.flush().map_err(RelayError::ScratchWrite)?;

        Ok(Self { file })
    }

    /// Absolute path handed to the analyzer.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
