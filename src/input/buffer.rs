//! Pure editing operations over a text buffer and cursor.
//!
//! Every function takes the current `(text, cursor)` pair and returns a new
//! [`TextState`]; nothing here touches shared state. The cursor is a byte
//! offset kept on a `char` boundary in `[0, text.len()]`; incoming cursors
//! that are out of range or off-boundary are clamped left before use.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextState {
    pub text: String,
    pub cursor: usize,
}

impl TextState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }
}

fn clamp_to_char_boundary_left(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while cursor > 0 && !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn prev_char_boundary(text: &str, cursor: usize) -> usize {
    let i = clamp_to_char_boundary_left(text, cursor);
    if i == 0 {
        return 0;
    }
    let mut j = i - 1;
    while j > 0 && !text.is_char_boundary(j) {
        j -= 1;
    }
    j
}

fn next_char_boundary(text: &str, cursor: usize) -> usize {
    let i = clamp_to_char_boundary_left(text, cursor);
    match text[i..].chars().next() {
        Some(ch) => i + ch.len_utf8(),
        None => text.len(),
    }
}

/// Splice `input` at the cursor as one atomic unit. The cursor advances by
/// the full encoded length of `input`, not by one.
pub fn insert_text(text: &str, cursor: usize, input: &str) -> TextState {
    let cursor = clamp_to_char_boundary_left(text, cursor);
    let mut out = String::with_capacity(text.len() + input.len());
    out.push_str(&text[..cursor]);
    out.push_str(input);
    out.push_str(&text[cursor..]);
    TextState {
        text: out,
        cursor: cursor + input.len(),
    }
}

/// Remove the character before the cursor. No-op when the cursor is already
/// at the start.
pub fn backspace(text: &str, cursor: usize) -> TextState {
    let end = clamp_to_char_boundary_left(text, cursor);
    if end == 0 {
        return TextState {
            text: text.to_string(),
            cursor: end,
        };
    }
    let start = prev_char_boundary(text, end);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    TextState {
        text: out,
        cursor: start,
    }
}

/// Remove the character at the cursor, leaving the cursor in place. No-op
/// when the cursor is at the end of the text.
pub fn delete_forward(text: &str, cursor: usize) -> TextState {
    let start = clamp_to_char_boundary_left(text, cursor);
    if start >= text.len() {
        return TextState {
            text: text.to_string(),
            cursor: start,
        };
    }
    let end = next_char_boundary(text, start);
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    TextState {
        text: out,
        cursor: start,
    }
}

/// Move one character left, clamped at 0.
pub fn move_cursor_left(text: &str, cursor: usize) -> usize {
    prev_char_boundary(text, cursor)
}

/// Move one character right, clamped at the end of the text.
pub fn move_cursor_right(text: &str, cursor: usize) -> usize {
    next_char_boundary(text, cursor)
}

pub fn move_cursor_to_start() -> usize {
    0
}

pub fn move_cursor_to_end(text: &str) -> usize {
    text.len()
}

/// Remove everything from the cursor through the end of the current line.
/// Text after a following line break is preserved; a trailing no-op when the
/// cursor already sits at the end of the text.
pub fn delete_to_line_end(text: &str, cursor: usize) -> TextState {
    let cursor = clamp_to_char_boundary_left(text, cursor);
    if cursor >= text.len() {
        return TextState {
            text: text.to_string(),
            cursor,
        };
    }
    let line_end = text[cursor..]
        .find('\n')
        .map(|i| cursor + i)
        .unwrap_or(text.len());
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..cursor]);
    out.push_str(&text[line_end..]);
    TextState { text: out, cursor }
}

/// Remove everything from the start of the text through the cursor and reset
/// the cursor to 0. No-op when the cursor is already at 0.
pub fn delete_to_line_start(text: &str, cursor: usize) -> TextState {
    let cursor = clamp_to_char_boundary_left(text, cursor);
    TextState {
        text: text[cursor..].to_string(),
        cursor: 0,
    }
}

pub fn clear() -> TextState {
    TextState::default()
}
