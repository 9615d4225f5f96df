use chrono::Local;
use clap::Parser;
use kdash::{headless, HeadlessOptions, OutputFormat};
use kdash_core::{config::Config, filter::DecisionFilter};
use kdash_feeds::FeedClient;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kdash", about = "Municipal open-data dashboard")]
struct Cli {
    /// Write debug logs to /tmp/kdash-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Read configuration from this file instead of the XDG location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `proxy.base_url`.
    #[arg(long, value_name = "URL")]
    proxy_url: Option<String>,

    /// Print the decisions list to stdout instead of starting the TUI.
    #[arg(long)]
    headless: bool,

    /// Decisions filter: all, viranomais, paatokset, esitykset, passed, meeting.
    #[arg(long, requires = "headless")]
    filter: Option<DecisionFilter>,

    /// Search text (title and description, case-insensitive).
    #[arg(long, requires = "headless")]
    query: Option<String>,

    /// Show every match instead of the first page.
    #[arg(long, requires = "headless")]
    all: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "headless")]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/kdash-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("kdash debug log started, tail -f /tmp/kdash-debug.log");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Config::defaults()
        }),
    };
    if let Some(url) = cli.proxy_url {
        config.proxy.base_url = url;
    }

    if !cli.headless {
        return kdash_tui::run(config);
    }

    let opts = HeadlessOptions {
        filter: cli.filter,
        query: cli.query,
        all: cli.all,
        format: cli.format,
    };
    let runtime = tokio::runtime::Runtime::new()?;
    let now = Local::now().naive_local();
    let client = FeedClient::new(&config.proxy.base_url)?;
    let store = runtime.block_on(headless::load(client, &config, now))?;
    headless::render(&store, &config, &opts, now, &mut std::io::stdout().lock())
}
