pub mod buffer;
pub mod editor;
pub mod history;
pub mod keys;

pub use buffer::TextState;
pub use editor::{InputAction, LineEditor};
pub use history::InputHistory;
