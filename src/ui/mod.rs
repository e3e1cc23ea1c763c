//! User interface subsystem - two-line text display + menu cursor helpers.
//!
//! Runners and the menu render into a [`Frame`] each poll; the controller
//! hands both rows to the [`lcd::Lcd`] adapter, which only touches the
//! panel when a row changed or an overflowing row has to scroll.

pub mod input_logic;
pub mod lcd;

use core::fmt::Write;

use crate::config::LINE_CAPACITY;

pub type Line = heapless::String<LINE_CAPACITY>;

/// Number of display rows.
pub const ROWS: usize = 2;

/// Text of both display rows for the current poll.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: [Line; ROWS],
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", |l| l.as_str())
    }

    /// Replace a row with `text`, truncated to the line capacity.
    pub fn set(&mut self, row: usize, text: &str) {
        self.set_fmt(row, format_args!("{}", text));
    }

    /// Replace a row with formatted text, truncated to the line capacity.
    pub fn set_fmt(&mut self, row: usize, args: core::fmt::Arguments<'_>) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            // Overflow only truncates.
            let _ = line.write_fmt(args);
        }
    }
}
