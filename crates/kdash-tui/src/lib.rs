//! kdash TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};

use kdash_core::config::Config;
use kdash_feeds::{loader, FeedClient, LoadSettings, Loader};

/// Start the dashboard against the proxy named in `config`.
///
/// Owns the tokio runtime the load tasks run on; the UI itself stays on the
/// calling thread.
pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let client = FeedClient::new(&config.proxy.base_url)?;
    let (tx, rx) = loader::channel();
    let loader = Loader::new(client, LoadSettings::from(&config), tx);
    tracing::info!(proxy = %config.proxy.base_url, "starting dashboard");

    let state = AppState::new(config, theme::Theme::load_default());
    App::new(state, loader, rx).run()
}
