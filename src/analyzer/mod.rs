pub mod mock;
pub mod process;

use async_trait::async_trait;
use std::path::Path;

use crate::error::RelayError;

/// What an analyzer produced for one scratch file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOutput {
    /// stdout lines, in emission order.
    pub lines: Vec<String>,
    /// Exit code, `None` when it ended on a signal. Scripted analyzers report `Some(0)`.
    pub exit_code: Option<i32>,
}

impl AnalysisOutput {
    /// Split raw stdout into lines.
    ///
    /// Lines break on `\n`; a `\r` right before it is dropped and the final
    /// terminator does not add an empty trailing line. Everything else is kept
    /// verbatim.
    pub fn from_stdout(stdout: &str, exit_code: Option<i32>) -> Self {
        Self {
            lines: stdout.lines().map(str::to_string).collect(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Lines joined for display.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Something that turns a file path into diagnostic lines.
///
/// Any implementation that reads the file at `path` and reports lines is a
/// drop-in replacement for the external checker.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(&self, path: &Path) -> Result<AnalysisOutput, RelayError>;
}
