use super::buffer::{self, TextState};
use super::history::InputHistory;
use super::keys;

/// What the caller should do after a chunk of raw input has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    Submit(String),
    Exit,
}

/// Line editor driven by raw terminal byte sequences.
///
/// Owns the edit buffer and the recall log; each call to [`handle_bytes`]
/// applies one input chunk synchronously and reports whether the caller has
/// to submit or exit. Interpretation order: exact key-table match, then the
/// forward-delete substring fallback, then submit on CR/LF, then literal
/// insertion for anything that does not start with the escape introducer.
/// Unrecognized escape sequences are dropped.
///
/// [`handle_bytes`]: LineEditor::handle_bytes
#[derive(Debug, Default)]
pub struct LineEditor {
    state: TextState,
    history: InputHistory,
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            state: TextState::default(),
            history: InputHistory::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    pub fn handle_bytes(&mut self, data: &str) -> InputAction {
        match data {
            keys::CTRL_C => return InputAction::Exit,
            keys::BACKSPACE | keys::CTRL_H => {
                self.state = buffer::backspace(&self.state.text, self.state.cursor);
            }
            keys::DELETE => {
                self.state = buffer::delete_forward(&self.state.text, self.state.cursor);
            }
            keys::CTRL_U => {
                self.state = buffer::delete_to_line_start(&self.state.text, self.state.cursor);
            }
            keys::CTRL_K => {
                self.state = buffer::delete_to_line_end(&self.state.text, self.state.cursor);
            }
            keys::ARROW_LEFT => {
                self.state.cursor = buffer::move_cursor_left(&self.state.text, self.state.cursor);
            }
            keys::ARROW_RIGHT => {
                self.state.cursor = buffer::move_cursor_right(&self.state.text, self.state.cursor);
            }
            keys::HOME | keys::CTRL_A => {
                self.state.cursor = buffer::move_cursor_to_start();
            }
            keys::END | keys::CTRL_E => {
                self.state.cursor = buffer::move_cursor_to_end(&self.state.text);
            }
            keys::ARROW_UP => {
                let recalled = self.history.previous();
                self.replace_with_recalled(&recalled);
            }
            keys::ARROW_DOWN => {
                let recalled = self.history.next();
                self.replace_with_recalled(&recalled);
            }
            "\r" | "\n" => return self.submit(),
            other if other.contains(keys::DELETE_MARKER) => {
                self.state = buffer::delete_forward(&self.state.text, self.state.cursor);
            }
            other if !other.starts_with(keys::ESC) => {
                self.state = buffer::insert_text(&self.state.text, self.state.cursor, other);
            }
            // Unknown escape sequence: never inserted as literal text.
            _ => {}
        }
        InputAction::None
    }

    fn submit(&mut self) -> InputAction {
        let value = std::mem::take(&mut self.state).text;
        self.history.push(&value);
        InputAction::Submit(value)
    }

    fn replace_with_recalled(&mut self, recalled: &str) {
        // An empty recall means there was nothing to restore; the buffer is
        // left exactly as it was.
        if recalled.is_empty() {
            return;
        }
        self.state = TextState::new(recalled);
    }
}
