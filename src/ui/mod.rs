//! Inline prompt rendering for raw mode.
//!
//! Deliberately thin: one status-prefixed prompt line redrawn in place, and
//! `\r\n`-terminated output lines above it. Anything richer belongs to a
//! real layout layer, which this client does not carry.

use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

const PROMPT: &str = "> ";
const BUSY_MARKER: &str = "… ";

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_display_width).sum()
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// `[provider: model]` status prefix shown before the prompt, with a busy
/// marker while requests are in flight.
pub fn status_prefix(provider: &str, model: &str, busy: bool) -> String {
    let marker = if busy { BUSY_MARKER } else { "" };
    format!("{marker}[{provider}: {model}] {PROMPT}")
}

/// Replace line breaks with a visible symbol so a pasted multi-line buffer
/// still renders on the single prompt line.
fn visible(text: &str) -> String {
    text.chars()
        .map(|ch| if ch == '\n' || ch == '\r' { '␤' } else { ch })
        .collect()
}

/// Print one finished output line above the prompt. The caller redraws the
/// prompt afterward.
pub fn print_output_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?;
    write!(out, "{line}\r\n")?;
    out.flush()
}

/// Wipe the whole screen and home the cursor (the `/clear` side effect).
pub fn clear_display(out: &mut impl Write) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    out.flush()
}

/// Redraw the prompt line in place and park the terminal cursor at the edit
/// cursor's display column.
pub fn draw_prompt(
    out: &mut impl Write,
    prefix: &str,
    buffer: &str,
    cursor: usize,
) -> io::Result<()> {
    let cursor = cursor.min(buffer.len());
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?;
    write!(out, "{prefix}{}", visible(buffer))?;
    let column = display_width(prefix) + display_width(&visible(&buffer[..cursor]));
    out.queue(MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)))?;
    out.flush()
}
