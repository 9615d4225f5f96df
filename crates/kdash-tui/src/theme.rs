//! Colour theme for the kdash TUI.
//!
//! Themes are defined as TOML files. The default theme is embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::load_default`] at startup and pass the result through
//! the application as a shared reference.
//!
//! # Colour assignment for issuers
//!
//! Issuer names are hashed to a stable index into the palette so the same
//! board or committee always gets the same colour, regardless of the order
//! in which the feeds list them.

use config::{Config, File, FileFormat};
use kdash_core::stats::Trend;
use kdash_core::Status;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.underlined {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    passed: RawStyle,
    meeting: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    up: RawStyle,
    down: RawStyle,
    neutral: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    command_bar: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawText {
    date: RawStyle,
    placeholder: RawStyle,
    hint: RawStyle,
    stat_value: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawIssuers {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    status: RawStatus,
    trend: RawTrend,
    borders: RawBorders,
    text: RawText,
    search: RawSearch,
    issuers: RawIssuers,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme. All styles are pre-resolved ratatui [`Style`]
/// values.
#[derive(Debug, Clone)]
pub struct Theme {
    pub status_passed: Style,
    pub status_meeting: Style,

    pub trend_up: Style,
    pub trend_down: Style,
    pub trend_neutral: Style,

    /// Border style for the currently focused pane.
    pub border_focused: Style,
    /// Border style for the command bar pane
    pub border_command_bar: Style,
    /// Border style for unfocused panes.
    pub border_unfocused: Style,

    pub date: Style,
    /// Loading, empty and error placeholders.
    pub placeholder: Style,
    /// "Show more" / "show less" hints.
    pub hint: Style,
    pub stat_value: Style,

    /// Inline highlight applied to the matched query in titles.
    pub search_highlight: Style,

    issuer_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme by name; unknown names give the default.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            _ => Self::load_default(),
        }
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            status_passed: raw.status.passed.into_style(),
            status_meeting: raw.status.meeting.into_style(),
            trend_up: raw.trend.up.into_style(),
            trend_down: raw.trend.down.into_style(),
            trend_neutral: raw.trend.neutral.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            date: raw.text.date.into_style(),
            placeholder: raw.text.placeholder.into_style(),
            hint: raw.text.hint.into_style(),
            stat_value: raw.text.stat_value.into_style(),
            search_highlight: raw.search.highlight.into_style(),
            issuer_palette: raw
                .issuers
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    pub fn status_style(&self, status: Option<Status>) -> Style {
        match status {
            Some(Status::Passed) => self.status_passed,
            Some(Status::Meeting) => self.status_meeting,
            None => Style::default(),
        }
    }

    pub fn trend_style(&self, trend: Trend) -> Style {
        match trend {
            Trend::Up => self.trend_up,
            Trend::Down => self.trend_down,
            Trend::Neutral => self.trend_neutral,
        }
    }

    /// Stable colour for an issuer name.
    pub fn issuer_style(&self, issuer: &str) -> Style {
        if self.issuer_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(issuer) % self.issuer_palette.len();
        Style::default().fg(self.issuer_palette[idx])
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style hash, stable across Rust versions and process restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes().fold(5381usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    })
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, etc.
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_loads() {
        let theme = Theme::load_default();
        assert_ne!(theme.status_passed, Style::default());
        assert_ne!(theme.border_focused, Style::default());
        assert_ne!(theme.search_highlight, Style::default());
        assert!(!theme.issuer_palette.is_empty());
    }

    #[test]
    fn gruvbox_dark_theme_loads() {
        let theme = Theme::by_name("gruvbox");
        assert_ne!(theme.status_meeting, Style::default());
        assert_ne!(theme.trend_down, Style::default());
        assert!(!theme.issuer_palette.is_empty());
    }

    #[test]
    fn issuer_style_is_stable() {
        let theme = Theme::load_default();
        assert_eq!(
            theme.issuer_style("Kaupunginhallitus"),
            theme.issuer_style("Kaupunginhallitus")
        );
    }

    #[test]
    fn status_and_trend_styles_differ() {
        let theme = Theme::load_default();
        assert_ne!(
            theme.status_style(Some(Status::Passed)),
            theme.status_style(Some(Status::Meeting))
        );
        assert_ne!(theme.trend_style(Trend::Up), theme.trend_style(Trend::Down));
    }

    #[test]
    fn parse_colors() {
        assert_eq!(parse_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(parse_color("indexed:42"), Some(Color::Indexed(42)));
        assert_eq!(parse_color("chartreuse"), None);
    }
}
