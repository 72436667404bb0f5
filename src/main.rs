use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stylerelay::analyzer::process::{ProcessAnalyzer, ProcessConfig};
use stylerelay::banner::{BannerInfo, print_banner, print_shutdown_summary};
use stylerelay::config::RelayConfig;
use stylerelay::consts::{
    DEFAULT_ANALYZER, DEFAULT_ANALYZER_TIMEOUT, DEFAULT_BIND, DEFAULT_SCRATCH_PREFIX,
    MAX_OUTPUT_BYTES,
};
use stylerelay::relay::FormRelay;
use stylerelay::scratch::ScratchConfig;
use stylerelay::server::{AppState, build_router};

#[derive(Parser)]
#[command(
    name = "stylerelay",
    version,
    about = "Paste code into a web form, get the style checker's verdict back."
)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "STYLERELAY_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Analyzer program; the scratch file path is passed as its last argument
    #[arg(short, long, env = "STYLERELAY_ANALYZER", default_value = DEFAULT_ANALYZER)]
    analyzer: String,

    /// Fixed argument for the analyzer, placed before the scratch path (repeatable)
    #[arg(long = "analyzer-arg", default_value = "style_check.py")]
    analyzer_args: Vec<String>,

    /// Working directory for the analyzer
    #[arg(short, long, env = "STYLERELAY_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Directory for per-request scratch files (default: system temp dir)
    #[arg(long, env = "STYLERELAY_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Name prefix for scratch files
    #[arg(long, env = "STYLERELAY_SCRATCH_PREFIX", default_value = DEFAULT_SCRATCH_PREFIX)]
    scratch_prefix: String,

    /// Analyzer timeout in seconds
    #[arg(
        short,
        long,
        env = "STYLERELAY_TIMEOUT",
        default_value_t = DEFAULT_ANALYZER_TIMEOUT.as_secs()
    )]
    timeout: u64,

    /// Analyzer stdout beyond this many bytes is truncated
    #[arg(long, default_value_t = MAX_OUTPUT_BYTES)]
    max_output_bytes: usize,

    /// Largest accepted form body in bytes (default: unlimited)
    #[arg(long, env = "STYLERELAY_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long, env = "STYLERELAY_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

impl Cli {
    fn into_config(self) -> RelayConfig {
        RelayConfig {
            bind: self.bind,
            analyzer: ProcessConfig {
                program: self.analyzer,
                args: self.analyzer_args,
                working_dir: self.work_dir,
                max_output_bytes: self.max_output_bytes,
            },
            scratch: ScratchConfig {
                dir: self.scratch_dir.unwrap_or_else(std::env::temp_dir),
                prefix: self.scratch_prefix,
            },
            analyzer_timeout: Duration::from_secs(self.timeout),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = cli.into_config();

    print_banner(&BannerInfo {
        bind: &config.bind,
        analyzer: &config.analyzer.display_command(),
        timeout: config.analyzer_timeout,
        scratch_dir: &config.scratch.dir,
        scratch_prefix: &config.scratch.prefix,
        max_output_bytes: config.analyzer.max_output_bytes,
    });

    let analyzer = Arc::new(ProcessAnalyzer::new(config.analyzer.clone()));
    let state = AppState::new(FormRelay::from_config(analyzer, &config));
    let app = build_router(state.clone(), config.max_body_bytes);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "stylerelay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested, draining requests");
        })
        .await
        .context("server failed")?;

    print_shutdown_summary(state.requests_served());
    Ok(())
}
