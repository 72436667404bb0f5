//! Runtime settings for the relay, assembled once at startup.

use std::time::Duration;

use crate::analyzer::process::ProcessConfig;
use crate::consts::{DEFAULT_ANALYZER_TIMEOUT, DEFAULT_BIND};
use crate::scratch::ScratchConfig;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: String,
    pub analyzer: ProcessConfig,
    pub scratch: ScratchConfig,
    /// Upper bound on one analyzer run; the child is killed past it.
    pub analyzer_timeout: Duration,
    /// Largest accepted form body. `None` accepts any size.
    pub max_body_bytes: Option<usize>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            analyzer: ProcessConfig::default(),
            scratch: ScratchConfig::default(),
            analyzer_timeout: DEFAULT_ANALYZER_TIMEOUT,
            max_body_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_the_analyzer_not_the_body() {
        let config = RelayConfig::default();
        assert_eq!(config.analyzer_timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, None);
        assert_eq!(config.scratch.prefix, "matlab-style");
    }

    #[test]
    fn scratch_defaults_to_os_temp_dir() {
        let config = RelayConfig::default();
        assert_eq!(config.scratch.dir, std::env::temp_dir());
    }

    #[test]
    fn override_keeps_other_defaults() {
        let config = RelayConfig {
            analyzer_timeout: Duration::from_millis(250),
            ..RelayConfig::default()
        };
        assert_eq!(config.analyzer_timeout, Duration::from_millis(250));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.analyzer.program, "python3");
    }
}
