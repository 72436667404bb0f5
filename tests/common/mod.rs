#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stylerelay::analyzer::process::{ProcessAnalyzer, ProcessConfig};
use stylerelay::relay::FormRelay;
use stylerelay::scratch::ScratchConfig;

/// Write a `sh` script into `dir` and return an analyzer that runs it as
/// `sh <script> <scratch path>`. Running through `sh` avoids executing a
/// freshly written file directly.
pub fn stub_analyzer(dir: &Path, body: &str) -> ProcessAnalyzer {
    let script = dir.join("analyzer.sh");
    std::fs::write(&script, format!("{body}\n")).unwrap();
    ProcessAnalyzer::new(ProcessConfig {
        program: "sh".to_string(),
        args: vec![script.to_string_lossy().into_owned()],
        ..ProcessConfig::default()
    })
}

/// A relay whose scratch files go into `scratch_dir`.
pub fn relay(analyzer: ProcessAnalyzer, scratch_dir: &Path, timeout: Duration) -> FormRelay {
    FormRelay::new(
        Arc::new(analyzer),
        ScratchConfig {
            dir: scratch_dir.to_path_buf(),
            ..ScratchConfig::default()
        },
        timeout,
    )
}

/// Reverse of the page's escaping, for reading field contents back.
pub fn unescape_html(input: &str) -> String {
    input
        .replace("&#13;", "\r")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Text shown in the textarea whose opening tag contains `marker`, as a browser would read it.
pub fn textarea_text(page: &str, marker: &str) -> String {
    let start = page.find(marker).expect("textarea marker");
    let open_end = start + page[start..].find('>').expect("open tag end") + 1;
    let close = open_end + page[open_end..].find("</textarea>").expect("close tag");
    // Parsers fold raw CR and CRLF into LF before anything else
    let raw = page[open_end..close].replace("\r\n", "\n").replace('\r', "\n");
    // then drop one newline directly after the open tag
    let raw = raw.strip_prefix('\n').unwrap_or(&raw);
    unescape_html(raw)
}
