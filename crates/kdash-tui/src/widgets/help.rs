//! Help popup: centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::event::Keymap;
use crate::theme::Theme;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    keymap: &'a Keymap,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keymap: &'a Keymap, theme: &'a Theme) -> Self {
        Self { keymap, theme }
    }

    fn bindings(&self) -> Vec<(String, &'static str)> {
        let k = self.keymap;
        vec![
            ("q  /  Ctrl+c".to_string(), "Lopeta"),
            (key_name(k.toggle_focus), "Vaihda paneelia"),
            (key_name(k.query_focus), "Hae kohdistetusta paneelista"),
            ("Escape".to_string(), "Tyhjennä haku / sulje ikkuna"),
            ("↑ k  /  ↓ j".to_string(), "Liiku listassa"),
            ("PageUp  /  Ctrl+u".to_string(), "Sivu ylös"),
            ("PageDown / Ctrl+d".to_string(), "Sivu alas"),
            (key_name(k.open_detail), "Näytä valitun kohteen tiedot"),
            (key_name(k.show_more), "Näytä lisää"),
            (key_name(k.show_less), "Näytä vähemmän (uutiset)"),
            (key_name(k.next_filter), "Seuraava päätössuodatin"),
            ("a".to_string(), "Seuraava kokoussuodatin"),
            (key_name(k.next_topic), "Seuraava uutisaihe"),
            (key_name(k.reload), "Lataa kaikki uudelleen"),
            (":".to_string(), "Komentorivi"),
            ("?".to_string(), "Tämä ohje"),
        ]
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bindings = self.bindings();
        let popup = centered_rect(64, bindings.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" kdash — näppäimet (? sulkee) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = bindings
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
