//! Startup banner and shutdown summary display.

use std::path::Path;
use std::time::Duration;

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};

/// Relay configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub bind: &'a str,
    pub analyzer: &'a str,
    pub timeout: Duration,
    pub scratch_dir: &'a Path,
    pub scratch_prefix: &'a str,
    pub max_output_bytes: usize,
}

/// Print the startup banner with relay info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║         S T Y L E   R E L A Y         ║
   ║    paste code, get the checker back   ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   listen    http://{}
   analyzer  {}
   timeout   {}s
   scratch   {}/{}*
   output    {} bytes max
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.bind,
        info.analyzer,
        info.timeout.as_secs_f64(),
        info.scratch_dir.display(),
        info.scratch_prefix,
        format_number(info.max_output_bytes as u64),
    );
}

/// Print the shutdown summary (requests served + farewell).
pub fn print_shutdown_summary(requests: u64) {
    if requests > 0 {
        println!("served {} request(s)", format_number(requests));
    }
    println!("goodbye.");
}
