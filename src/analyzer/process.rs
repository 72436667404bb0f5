use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use super::{AnalysisOutput, Analyzer};
use crate::consts::{DEFAULT_ANALYZER, DEFAULT_ANALYZER_ARGS, MAX_OUTPUT_BYTES};
use crate::error::RelayError;

/// Safe environment variables to pass through. Everything else is stripped.
const SAFE_ENV_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "LC_ALL",
    "TZ",
    "PYTHONPATH",
    "PYTHONIOENCODING",
];

/// How to launch the external checker.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub program: String,
    /// Fixed arguments placed before the scratch path.
    pub args: Vec<String>,
    /// Working directory for the child. `None` inherits the relay's.
    pub working_dir: Option<PathBuf>,
    pub max_output_bytes: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ANALYZER.to_string(),
            args: DEFAULT_ANALYZER_ARGS.iter().map(|a| a.to_string()).collect(),
            working_dir: None,
            max_output_bytes: MAX_OUTPUT_BYTES,
        }
    }
}

impl ProcessConfig {
    /// Human-readable command line, scratch path shown as `<file>`.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push("<file>".to_string());
        parts.join(" ")
    }
}

/// Runs an external program as `<program> <args>... <path>` and collects its stdout.
///
/// The argv is passed directly, never through a shell. The child is killed
/// if the future is dropped, so an outer timeout terminates it.
pub struct ProcessAnalyzer {
    config: ProcessConfig,
}

impl ProcessAnalyzer {
    pub fn new(config: ProcessConfig) -> Self {
        Self { config }
    }

    /// Keep the first `max_bytes` of a stream and count the rest without storing it.
    /// Draining keeps the child from blocking on a full pipe.
    async fn read_capped<R>(mut reader: R, max_bytes: usize) -> io::Result<(Vec<u8>, u64)>
    where
        R: AsyncRead + Unpin,
    {
        let mut head = Vec::new();
        (&mut reader)
            .take(max_bytes as u64)
            .read_to_end(&mut head)
            .await?;
        let rest = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
        let total = head.len() as u64 + rest;
        Ok((head, total))
    }

    /// Decode captured bytes; when `total` exceeds what was kept, cut at the
    /// last complete character and append a marker line.
    fn truncate_output(head: &[u8], total: u64) -> String {
        if total <= head.len() as u64 {
            return String::from_utf8_lossy(head).into_owned();
        }
        let end = match std::str::from_utf8(head) {
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            _ => head.len(),
        };
        let kept = String::from_utf8_lossy(&head[..end]);
        let sep = if kept.is_empty() || kept.ends_with('\n') { "" } else { "\n" };
        format!("{kept}{sep}[truncated: showing {end}/{total} bytes]\n")
    }

    fn filtered_env() -> Vec<(String, String)> {
        SAFE_ENV_VARS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|val| (key.to_string(), val)))
            .collect()
    }
}

#[async_trait]
impl Analyzer for ProcessAnalyzer {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn analyze(&self, path: &Path) -> Result<AnalysisOutput, RelayError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(path)
            .env_clear()
            .envs(Self::filtered_env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(RelayError::Spawn)?;
        info!(
            pid = child.id().unwrap_or_default(),
            program = %self.config.program,
            "analyzer started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RelayError::OutputRead(io::Error::other("stdout not piped")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RelayError::OutputRead(io::Error::other("stderr not piped")))?;

        let max_bytes = self.config.max_output_bytes;
        let ((out_head, out_total), (err_head, err_total), status) = tokio::try_join!(
            Self::read_capped(stdout, max_bytes),
            Self::read_capped(stderr, max_bytes),
            child.wait(),
        )
        .map_err(RelayError::OutputRead)?;

        if err_total > 0 {
            let stderr = Self::truncate_output(&err_head, err_total);
            debug!(stderr = %stderr.trim_end(), "analyzer stderr");
        }

        let result = AnalysisOutput::from_stdout(
            &Self::truncate_output(&out_head, out_total),
            status.code(),
        );
        info!(
            exit_code = status.code().unwrap_or(-1),
            stdout_bytes = out_total,
            lines = result.lines.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analyzer finished"
        );
        Ok(result)
    }
}
