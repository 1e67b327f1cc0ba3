//! Parley is a terminal chat client that routes prompts to one of several
//! language-model backends.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`input`] owns the line editor: pure buffer operations, the raw key
//!   byte-sequence interpreter, and the input recall history.
//! - [`commands`] implements slash-command registration and dispatch with a
//!   closed set of command names.
//! - [`api`] defines the provider abstraction: the uniform send-prompt
//!   contract, the optional model-management capability, and the router that
//!   fans a prompt out to the selected backend.
//! - [`state`] holds the session's provider/model selection behind an
//!   explicit shared handle.
//! - [`app`] ties the layers together in one event loop; [`ui`] is a thin
//!   inline prompt renderer over it.

pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod input;
pub mod state;
pub mod terminal;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
pub mod test_support;
