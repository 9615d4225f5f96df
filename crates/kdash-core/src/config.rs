//! Configuration types for kdash.
//!
//! [`Config::load`] reads `~/.config/kdash/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[proxy]
base_url = "https://kaupunki.onrender.com"

[dashboard]
organization           = "Kokkola"
decisions_page_size    = 15
agenda_limit           = 8
past_agenda_year_floor = 2026

[news]
topics    = ["arctial", "kokkola"]
page_size = 10

[stats]
source       = "proxy"
pxweb_url    = "https://pxdata.stat.fi/PxWeb/api/v1/fi/StatFin"
area_code    = "KU272"
population   = { table = "vaerak/statfin_vaerak_pxt_11ra.px", indicator = "vaesto", period = "2024", previous = "2023" }
youth_share  = { table = "vaerak/statfin_vaerak_pxt_11ra.px", indicator = "nuoret_osuus", period = "2024", previous = "2023" }
unemployment = { table = "tyonv/statfin_tyonv_pxt_12r5.px", indicator = "TYOTOSUUS", period = "2025M06", previous = "2024M06" }

[ui]
show_dates          = true
side_pane_width_pct = 40

[keybindings]
toggle_focus = "Tab"
query_focus  = "/"
show_more    = "m"
show_less    = "l"
next_filter  = "f"
next_topic   = "t"
reload       = "r"
open_detail  = "Enter"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/kdash/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub proxy: ProxyConfig,
    pub dashboard: DashboardConfig,
    pub news: NewsConfig,
    pub stats: StatsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[proxy]` section: the open-data proxy every feed is fetched through.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    pub base_url: String,
}

/// `[dashboard]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Issuer shown for titles without an `"<issuer> / "` prefix.
    pub organization: String,
    pub decisions_page_size: usize,
    pub agenda_limit: usize,
    /// Oldest year the "past" agenda filter still shows.
    pub past_agenda_year_floor: i32,
}

/// `[news]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub topics: Vec<String>,
    pub page_size: usize,
}

/// Where the headline statistics come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    /// Precomputed `/stats` JSON served by the proxy.
    Proxy,
    /// Direct PxWeb selection queries against the statistics API.
    Pxweb,
}

/// `[stats]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    pub source: StatsSource,
    pub pxweb_url: String,
    pub area_code: String,
    pub population: IndicatorQuery,
    pub youth_share: IndicatorQuery,
    pub unemployment: IndicatorQuery,
}

/// One PxWeb table/indicator with the current and comparison periods.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorQuery {
    pub table: String,
    pub indicator: String,
    pub period: String,
    pub previous: String,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_dates")]
    pub show_dates: bool,
    #[serde(default = "default_side_pane_width_pct")]
    pub side_pane_width_pct: u16,
}

fn default_show_dates() -> bool { true }
fn default_side_pane_width_pct() -> u16 { 40 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_dates: default_show_dates(),
            side_pane_width_pct: default_side_pane_width_pct(),
        }
    }
}

/// `[keybindings]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_toggle_focus")]
    pub toggle_focus: String,
    #[serde(default = "default_query_focus")]
    pub query_focus: String,
    #[serde(default = "default_show_more")]
    pub show_more: String,
    #[serde(default = "default_show_less")]
    pub show_less: String,
    #[serde(default = "default_next_filter")]
    pub next_filter: String,
    #[serde(default = "default_next_topic")]
    pub next_topic: String,
    #[serde(default = "default_reload")]
    pub reload: String,
    #[serde(default = "default_open_detail")]
    pub open_detail: String,
}

fn default_toggle_focus() -> String { "Tab".to_string() }
fn default_query_focus() -> String { "/".to_string() }
fn default_show_more() -> String { "m".to_string() }
fn default_show_less() -> String { "l".to_string() }
fn default_next_filter() -> String { "f".to_string() }
fn default_next_topic() -> String { "t".to_string() }
fn default_reload() -> String { "r".to_string() }
fn default_open_detail() -> String { "Enter".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            toggle_focus: default_toggle_focus(),
            query_focus: default_query_focus(),
            show_more: default_show_more(),
            show_less: default_show_less(),
            next_filter: default_next_filter(),
            next_topic: default_next_topic(),
            reload: default_reload(),
            open_detail: default_open_detail(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/kdash/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Layer the file at `path` (if present) over the built-in defaults.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("kdash")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
