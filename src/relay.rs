//! The form relay: stage the submission, run the analyzer, render the result.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::analyzer::{AnalysisOutput, Analyzer};
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::page;
use crate::scratch::{ScratchConfig, ScratchFile};

/// One handled submission: what the user sent and what to show back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub content: String,
    pub lines: Vec<String>,
}

impl Report {
    /// A report for a submission that never reached the analyzer.
    pub fn failed(content: String, err: &RelayError) -> Self {
        Self {
            content,
            lines: err.diagnostic().into_iter().collect(),
        }
    }

    pub fn diagnostics(&self) -> String {
        self.lines.join("\n")
    }

    pub fn render(&self) -> String {
        page::render(&self.content, &self.diagnostics())
    }
}

pub struct FormRelay {
    analyzer: Arc<dyn Analyzer>,
    scratch: ScratchConfig,
    timeout: Duration,
}

impl FormRelay {
    pub fn new(analyzer: Arc<dyn Analyzer>, scratch: ScratchConfig, timeout: Duration) -> Self {
        Self {
            analyzer,
            scratch,
            timeout,
        }
    }

    pub fn from_config(analyzer: Arc<dyn Analyzer>, config: &RelayConfig) -> Self {
        Self::new(analyzer, config.scratch.clone(), config.analyzer_timeout)
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Run one submission through the pipeline. Never fails: problems end up
    /// as an empty or one-line output field.
    pub async fn handle(&self, content: Option<String>) -> Report {
        let content = content.unwrap_or_default();

        let lines = match self.run(&content).await {
            Ok(output) => {
                if !output.success() {
                    let err = RelayError::NonZeroExit(output.exit_code);
                    warn!(error = %err, lines = output.lines.len(), "analyzer failed");
                }
                output.lines
            }
            Err(err) => {
                warn!(error = %err, "submission not analyzed");
                err.diagnostic().into_iter().collect()
            }
        };

        Report { content, lines }
    }

    async fn run(&self, content: &str) -> Result<AnalysisOutput, RelayError> {
        // Dropped at the end of this call, which deletes the file on every path.
        let scratch = ScratchFile::stage(&self.scratch, content).await?;
        info!(path = %scratch.path().display(), bytes = content.len(), "submission staged");

        tokio::time::timeout(self.timeout, self.analyzer.analyze(scratch.path()))
            .await
            .map_err(|_| RelayError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::ScriptedAnalyzer;
    use async_trait::async_trait;
    use std::path::Path;

    struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn analyze(&self, _path: &Path) -> Result<AnalysisOutput, RelayError> {
            Err(RelayError::Spawn(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )))
        }
    }

    struct SlowAnalyzer;

    #[async_trait]
    impl Analyzer for SlowAnalyzer {
        fn name(&self) -> &str {
            "slow"
        }

        async fn analyze(&self, _path: &Path) -> Result<AnalysisOutput, RelayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(AnalysisOutput::default())
        }
    }

    fn relay_with(analyzer: Arc<dyn Analyzer>, dir: &Path) -> FormRelay {
        FormRelay::new(
            analyzer,
            ScratchConfig {
                dir: dir.to_path_buf(),
                ..ScratchConfig::default()
            },
            Duration::from_millis(200),
        )
    }

    #[test]
    fn report_joins_lines_with_newline() {
        let report = Report {
            content: String::new(),
            lines: vec!["Line 1".to_string(), "Line 2".to_string()],
        };
        assert_eq!(report.diagnostics(), "Line 1\nLine 2");
    }

    #[test]
    fn failed_report_carries_only_the_diagnostic() {
        let err = RelayError::Unreadable("bad".to_string());
        let report = Report::failed(String::new(), &err);
        assert_eq!(report.content, "");
        assert_eq!(report.lines, vec!["submission could not be read"]);
    }

    #[tokio::test]
    async fn missing_content_is_empty_submission() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(ScriptedAnalyzer::new(Vec::<String>::new()));
        let relay = relay_with(analyzer.clone(), dir.path());

        let report = relay.handle(None).await;

        assert_eq!(report.content, "");
        assert!(report.lines.is_empty());
        assert_eq!(analyzer.seen()[0].1, b"");
    }

    #[tokio::test]
    async fn spawn_failure_becomes_diagnostic_line() {
        let dir = tempfile::tempdir().unwrap();
        let relay = relay_with(Arc::new(FailingAnalyzer), dir.path());

        let report = relay.handle(Some("x = 1;".to_string())).await;

        assert_eq!(report.content, "x = 1;");
        assert_eq!(report.lines, vec!["analyzer could not be started"]);
    }

    #[tokio::test]
    async fn timeout_becomes_diagnostic_line() {
        let dir = tempfile::tempdir().unwrap();
        let relay = relay_with(Arc::new(SlowAnalyzer), dir.path());

        let report = relay.handle(Some("x".to_string())).await;

        assert_eq!(report.lines, vec!["analyzer timed out after 0.2s"]);
    }

    #[tokio::test]
    async fn staging_failure_still_reports() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Arc::new(ScriptedAnalyzer::new(["never"]));
        let relay = relay_with(analyzer.clone(), &dir.path().join("missing"));

        let report = relay.handle(Some("kept".to_string())).await;

        assert_eq!(report.content, "kept");
        assert_eq!(report.lines, vec!["submission could not be staged for analysis"]);
        assert!(analyzer.seen().is_empty());
    }

    #[tokio::test]
    async fn scratch_dir_is_empty_after_handling() {
        let dir = tempfile::tempdir().unwrap();
        let relay = relay_with(Arc::new(ScriptedAnalyzer::new(["ok"])), dir.path());

        relay.handle(Some("a".to_string())).await;
        relay.handle(Some("b".to_string())).await;

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
