//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`to_app_event`] on every [`crossterm::event::Event`]
//! and match on the returned [`AppEvent`] instead of crossterm types.
//!
//! # Keybindings
//!
//! The rebindable keys come from the `[keybindings]` section of the config
//! through [`Keymap`]; the rest are fixed.
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab` (rebindable)      | `FocusNext`                |
//! | `/` (rebindable)        | `QueryFocus`               |
//! | `m` (rebindable)        | `ShowMore`                 |
//! | `l` (rebindable)        | `ShowLess`                 |
//! | `f` (rebindable)        | `NextFilter`               |
//! | `t` (rebindable)        | `NextTopic`                |
//! | `r` (rebindable)        | `Reload`                   |
//! | `Enter` (rebindable)    | `Enter`                    |
//! | `a`                     | `NextAgendaFilter`         |
//! | `PageUp`, `Ctrl+u`      | `ScrollUp`                 |
//! | `PageDown`, `Ctrl+d`    | `ScrollDown`               |
//! | `↑` / `k`, `↓` / `j`    | `Nav(Up)`, `Nav(Down)`     |
//! | `←`, `→`                | `Nav(Left)`, `Nav(Right)`  |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When a text-input widget (query bar, command bar) is focused, the event
//! loop calls [`to_app_event_insert`] instead. Every printable character is
//! forwarded as `Char`; only `Ctrl+c`, `Escape`, `Enter`, `Tab`, `Backspace`
//! and the arrow keys keep their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use kdash_core::config::KeybindingsConfig;

/// Direction for list navigation and text-cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Move keyboard focus to the next pane (Tab-cycle).
    FocusNext,
    /// Transfer focus to the query bar of the focused pane.
    QueryFocus,
    ScrollUp,
    ScrollDown,
    Nav(Direction),
    /// "Show more" in the focused pane.
    ShowMore,
    /// "Show less" in the news pane.
    ShowLess,
    /// Cycle the decisions category filter.
    NextFilter,
    /// Cycle the agenda filter.
    NextAgendaFilter,
    /// Switch the news pane to the next topic.
    NextTopic,
    /// Reload every dashboard region.
    Reload,
    /// A printable character forwarded to the active text input.
    Char(char),
    Backspace,
    /// Confirm input or open the detail popup.
    Enter,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
    /// Dismiss the active modal (query bar focus, popups).
    Escape,
}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

/// Resolved rebindable keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub toggle_focus: KeyCode,
    pub query_focus: KeyCode,
    pub show_more: KeyCode,
    pub show_less: KeyCode,
    pub next_filter: KeyCode,
    pub next_topic: KeyCode,
    pub reload: KeyCode,
    pub open_detail: KeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

impl Keymap {
    /// Resolve config strings. Unparseable entries fall back to the default
    /// key for that action.
    pub fn from_config(cfg: &KeybindingsConfig) -> Self {
        let defaults = KeybindingsConfig::default();
        let resolve = |configured: &str, fallback: &str| {
            parse_key(configured).or_else(|| {
                tracing::warn!(key = configured, "unrecognised keybinding, using default");
                parse_key(fallback)
            })
            .unwrap_or(KeyCode::Null)
        };
        Self {
            toggle_focus: resolve(&cfg.toggle_focus, &defaults.toggle_focus),
            query_focus: resolve(&cfg.query_focus, &defaults.query_focus),
            show_more: resolve(&cfg.show_more, &defaults.show_more),
            show_less: resolve(&cfg.show_less, &defaults.show_less),
            next_filter: resolve(&cfg.next_filter, &defaults.next_filter),
            next_topic: resolve(&cfg.next_topic, &defaults.next_topic),
            reload: resolve(&cfg.reload, &defaults.reload),
            open_detail: resolve(&cfg.open_detail, &defaults.open_detail),
        }
    }

    fn lookup(&self, code: KeyCode) -> Option<AppEvent> {
        let table = [
            (self.toggle_focus, AppEvent::FocusNext),
            (self.query_focus, AppEvent::QueryFocus),
            (self.show_more, AppEvent::ShowMore),
            (self.show_less, AppEvent::ShowLess),
            (self.next_filter, AppEvent::NextFilter),
            (self.next_topic, AppEvent::NextTopic),
            (self.reload, AppEvent::Reload),
            (self.open_detail, AppEvent::Enter),
        ];
        table
            .into_iter()
            .find(|(key, _)| *key == code)
            .map(|(_, ev)| ev)
    }
}

/// `"Tab"`, `"Enter"`, `"Space"`, `"Esc"` or a single character.
fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Tab" => Some(KeyCode::Tab),
        "Enter" => Some(KeyCode::Enter),
        "Space" => Some(KeyCode::Char(' ')),
        "Esc" => Some(KeyCode::Esc),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
///
/// Returns `None` for events that carry no semantic meaning for the
/// application (mouse events, unbound keys).
pub fn to_app_event(event: Event, keymap: &Keymap) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key, keymap),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input ("insert") mode.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent, keymap: &Keymap) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    if key.modifiers == Mod::CONTROL {
        return match key.code {
            Char('c') => Some(AppEvent::Quit),
            Char('u') => Some(AppEvent::ScrollUp),
            Char('d') => Some(AppEvent::ScrollDown),
            _ => None,
        };
    }

    let plain = key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT;
    if plain {
        if let Some(ev) = keymap.lookup(key.code) {
            return Some(ev);
        }
    }

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('a') if key.modifiers == Mod::NONE => Some(AppEvent::NextAgendaFilter),

        PageUp => Some(AppEvent::ScrollUp),
        PageDown => Some(AppEvent::ScrollDown),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Char(c) if plain => Some(AppEvent::Char(c)),

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

/// Key mapping for text-input / insert mode.
fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
