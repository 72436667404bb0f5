use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{AnalysisOutput, Analyzer};
use crate::error::RelayError;

/// An in-process analyzer for tests. Returns fixed lines and records every
/// file it was given along with the bytes it found there.
pub struct ScriptedAnalyzer {
    lines: Vec<String>,
    seen: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl ScriptedAnalyzer {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Paths and contents observed so far, in call order.
    pub fn seen(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, path: &Path) -> Result<AnalysisOutput, RelayError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(RelayError::OutputRead)?;
        self.seen.lock().unwrap().push((path.to_path_buf(), bytes));
        Ok(AnalysisOutput {
            lines: self.lines.clone(),
            exit_code: Some(0),
        })
    }
}
