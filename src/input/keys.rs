//! Raw key byte sequences as they arrive from a terminal in raw mode.
//!
//! These exact strings are a wire contract with the terminal; they are
//! compared byte-for-byte against incoming input chunks.

pub const CTRL_C: &str = "\x03";
pub const BACKSPACE: &str = "\x7f";
pub const CTRL_H: &str = "\x08";
pub const DELETE: &str = "\x1b[3~";
pub const CTRL_U: &str = "\x15";
pub const CTRL_K: &str = "\x0b";
pub const ARROW_UP: &str = "\x1b[A";
pub const ARROW_DOWN: &str = "\x1b[B";
pub const ARROW_RIGHT: &str = "\x1b[C";
pub const ARROW_LEFT: &str = "\x1b[D";
pub const HOME: &str = "\x1b[H";
pub const END: &str = "\x1b[F";
pub const CTRL_A: &str = "\x01";
pub const CTRL_E: &str = "\x05";

/// Escape introducer; chunks starting with this byte that match no known
/// sequence are discarded rather than inserted as text.
pub const ESC: char = '\x1b';

/// Some terminals report forward-delete inside a larger escape chunk; this
/// marker is matched as a substring as a fallback.
pub const DELETE_MARKER: &str = "[3~";
