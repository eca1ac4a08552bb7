//! Editing model for the calculator display.
//!
//! Holds the text being typed, a cursor, and the state of history
//! navigation. The widget layer only forwards keystrokes here and renders
//! [`Entry::text`].

use super::error::is_terminal_label;
use super::evaluation::Calculator;
use crate::history::HistorySink;

/// Cursor movement and history navigation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Index into the history while browsing it.
    history_index: Option<usize>,
    /// Input stashed when history browsing started.
    stashed_input: String,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the text and move the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Insert `value` at the cursor. A result label on display is cleared
    /// first.
    pub fn insert(&mut self, value: &str) {
        if is_terminal_label(&self.text) {
            self.text.clear();
            self.cursor = 0;
        }
        let offset = self.byte_offset(self.cursor);
        self.text.insert_str(offset, value);
        self.cursor += value.chars().count();
    }

    /// Delete the char before the cursor, or clear a result label.
    pub fn backspace(&mut self) {
        if is_terminal_label(&self.text) {
            self.text.clear();
            self.cursor = 0;
            return;
        }
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Move the cursor one char left or right.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.cursor = self.cursor.saturating_sub(1),
            Direction::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            Direction::Up | Direction::Down => {}
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.history_index = None;
    }

    /// Browse `history` (oldest first). Up walks back in time; down walks
    /// forward and, past the newest entry, restores the input that was
    /// being typed.
    pub fn navigate_history(&mut self, direction: Direction, history: &[String]) {
        if history.is_empty() {
            return;
        }

        let index = match (direction, self.history_index) {
            (Direction::Up, None) => {
                self.stashed_input = self.text.clone();
                history.len() - 1
            }
            (Direction::Up, Some(index)) => index.saturating_sub(1).min(history.len() - 1),
            (Direction::Down, None) => return,
            (Direction::Down, Some(index)) if index + 1 >= history.len() => {
                self.history_index = None;
                let stashed = std::mem::take(&mut self.stashed_input);
                self.set_text(stashed);
                return;
            }
            (Direction::Down, Some(index)) => index + 1,
            (Direction::Left | Direction::Right, _) => return,
        };

        self.history_index = Some(index);
        self.set_text(history[index].clone());
    }

    /// Evaluate the current text and show the result or error label.
    pub fn calculate<H: HistorySink>(&mut self, calculator: &mut Calculator<H>) {
        let result = calculator.calculate(&self.text);
        self.set_text(result.display());
        self.history_index = None;
    }
}
