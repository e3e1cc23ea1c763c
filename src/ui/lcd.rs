//! Two-row character display with horizontal scrolling.
//!
//! Rows that fit in `DISPLAY_COLS` are written once when their text
//! changes. Longer rows scroll one character every `SCROLL_INTERVAL_MS`,
//! wrapping back to offset 0 after the last character.

use crate::config::{DISPLAY_COLS, SCROLL_INTERVAL_MS};
use crate::devices::TextPanel;
use crate::ui::{Line, ROWS};

#[derive(Default)]
struct RowState {
    text: Line,
    offset: usize,
    last_scroll: u64,
    drawn: bool,
}

pub struct Lcd<P: TextPanel> {
    panel: P,
    rows: [RowState; ROWS],
}

impl<P: TextPanel> Lcd<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            rows: Default::default(),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Show `text` on `row`. Idempotent for identical short text.
    pub fn show_line(&mut self, text: &str, row: u8, now: u64) {
        let Some(state) = self.rows.get_mut(usize::from(row)) else {
            return;
        };

        let changed = !state.drawn || state.text.as_str() != text;
        if changed {
            state.text.clear();
            // Text longer than a line is cut by the frame already.
            let _ = state.text.push_str(text);
            state.offset = 0;
        }

        let len = state.text.chars().count();
        if len <= DISPLAY_COLS {
            if changed {
                self.panel.write_row(row, &state.text);
                state.drawn = true;
            }
            return;
        }

        if changed || now.saturating_sub(state.last_scroll) >= SCROLL_INTERVAL_MS {
            self.panel
                .write_row(row, window(&state.text, state.offset, DISPLAY_COLS));
            state.offset += 1;
            if state.offset >= len {
                state.offset = 0;
            }
            state.last_scroll = now;
            state.drawn = true;
        }
    }
}

/// `cols` characters of `text` starting at character `offset`.
fn window(text: &str, offset: usize, cols: usize) -> &str {
    let start = text.char_indices().nth(offset).map_or(text.len(), |(i, _)| i);
    let end = text[start..]
        .char_indices()
        .nth(cols)
        .map_or(text.len(), |(i, _)| start + i);
    &text[start..end]
}
