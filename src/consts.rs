//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Address the relay listens on when none is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Fixed tag every scratch file name starts with.
pub const DEFAULT_SCRATCH_PREFIX: &str = "matlab-style";

/// Analyzer program and its fixed arguments. The scratch path is appended last.
pub const DEFAULT_ANALYZER: &str = "python3";
pub const DEFAULT_ANALYZER_ARGS: &[&str] = &["style_check.py"];

/// How long a single analyzer run may take before it is killed.
pub const DEFAULT_ANALYZER_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum analyzer stdout in bytes. Anything beyond this is truncated.
pub const MAX_OUTPUT_BYTES: usize = 50_000;

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
