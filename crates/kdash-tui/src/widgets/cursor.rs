//! Selection cursor shared by the list panes.

use crate::event::{AppEvent, Direction};

const PAGE_STEP: usize = 10;

/// Selected row of a list whose length can change between renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    selected: usize,
}

impl ListCursor {
    pub fn selected(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Apply a navigation event against a list of `len` rows.
    pub fn handle(&mut self, event: &AppEvent, len: usize) {
        let last = len.saturating_sub(1);
        self.selected = self.selected.min(last);
        match event {
            AppEvent::Nav(Direction::Up) => self.selected = self.selected.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.selected = (self.selected + 1).min(last),
            AppEvent::ScrollUp => self.selected = self.selected.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => self.selected = (self.selected + PAGE_STEP).min(last),
            _ => {}
        }
    }

    /// First row to draw so the selection stays inside `height` rows.
    pub fn offset(&self, len: usize, height: usize) -> usize {
        match self.selected(len) {
            Some(sel) if height > 0 && sel >= height => sel + 1 - height,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_list() {
        let mut c = ListCursor::default();
        c.handle(&AppEvent::Nav(Direction::Up), 3);
        assert_eq!(c.selected(3), Some(0));
        for _ in 0..5 {
            c.handle(&AppEvent::Nav(Direction::Down), 3);
        }
        assert_eq!(c.selected(3), Some(2));
        // List shrank under the cursor.
        assert_eq!(c.selected(1), Some(0));
        assert_eq!(c.selected(0), None);
    }

    #[test]
    fn offset_keeps_selection_visible() {
        let mut c = ListCursor::default();
        c.handle(&AppEvent::ScrollDown, 40);
        c.handle(&AppEvent::ScrollDown, 40);
        assert_eq!(c.selected(40), Some(20));
        assert_eq!(c.offset(40, 8), 13);
        assert_eq!(c.offset(40, 30), 0);
    }
}
