//! Ratatui widgets for the kdash TUI.

pub mod command_bar;
pub mod cursor;
pub mod detail;
pub mod help;
pub mod query_bar;
pub mod record_list;
pub mod rows;
pub mod stats_bar;
pub mod tab_bar;
