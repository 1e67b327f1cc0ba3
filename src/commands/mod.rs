//! Slash-command parsing and dispatch.
//!
//! Command names form a closed set: [`CommandName`] is the only way into the
//! registry, and registering anything outside it is an error at registration
//! time rather than a silent misroute at dispatch time. User-typed input is
//! split at the first whitespace; the remainder is passed to the handler
//! verbatim (trimmed, no quoting rules).

pub mod builtins;

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

/// The fixed set of recognized command names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Clear,
    Providers,
    SetProvider,
    CurrentProvider,
    ListModels,
    SetModel,
    CurrentModel,
    Exit,
}

impl CommandName {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Help => "help",
            CommandName::Clear => "clear",
            CommandName::Providers => "providers",
            CommandName::SetProvider => "setprovider",
            CommandName::CurrentProvider => "currentprovider",
            CommandName::ListModels => "listmodels",
            CommandName::SetModel => "setmodel",
            CommandName::CurrentModel => "currentmodel",
            CommandName::Exit => "exit",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = anyhow::Error;

    // Case-sensitive: command lookup is exact.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "help" => Ok(CommandName::Help),
            "clear" => Ok(CommandName::Clear),
            "providers" => Ok(CommandName::Providers),
            "setprovider" => Ok(CommandName::SetProvider),
            "currentprovider" => Ok(CommandName::CurrentProvider),
            "listmodels" => Ok(CommandName::ListModels),
            "setmodel" => Ok(CommandName::SetModel),
            "currentmodel" => Ok(CommandName::CurrentModel),
            "exit" => Ok(CommandName::Exit),
            other => bail!("Invalid command name: {other}"),
        }
    }
}

/// Output a command produces, delivered to the display loop over one
/// channel; there is no separate error channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutput {
    Lines(Vec<String>),
    ClearDisplay,
}

pub type CommandHandler = Box<dyn Fn(&str, &CommandContext<'_>) + Send>;

pub struct SlashCommand {
    pub name: String,
    pub description: String,
    pub handler: CommandHandler,
}

impl SlashCommand {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&str, &CommandContext<'_>) + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(handler),
        }
    }
}

/// What a handler can reach while it runs: the shared output channel and the
/// registry's own command listing (for `help`).
pub struct CommandContext<'a> {
    registry: &'a CommandRegistry,
}

impl CommandContext<'_> {
    pub fn show_output(&self, lines: Vec<String>) {
        self.registry.show_output(lines);
    }

    pub fn clear_display(&self) {
        let _ = self.registry.output_tx.send(CommandOutput::ClearDisplay);
    }

    /// Clone of the output channel, for handlers that finish asynchronously.
    pub fn output_sender(&self) -> mpsc::UnboundedSender<CommandOutput> {
        self.registry.output_tx.clone()
    }

    /// `(name, description)` for every registered command, in registration
    /// order.
    pub fn command_summaries(&self) -> Vec<(String, String)> {
        self.registry
            .commands
            .iter()
            .map(|cmd| (cmd.name.clone(), cmd.description.clone()))
            .collect()
    }
}

pub struct CommandRegistry {
    commands: Vec<SlashCommand>,
    output_tx: mpsc::UnboundedSender<CommandOutput>,
}

impl CommandRegistry {
    pub fn new(output_tx: mpsc::UnboundedSender<CommandOutput>) -> Self {
        Self {
            commands: Vec::new(),
            output_tx,
        }
    }

    /// Register one command. The name must belong to the recognized set;
    /// anything else is a programming error and fails here. Registering a
    /// name that already exists replaces the earlier command.
    pub fn register(&mut self, command: SlashCommand) -> Result<()> {
        command.name.parse::<CommandName>()?;
        match self
            .commands
            .iter_mut()
            .find(|existing| existing.name == command.name)
        {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
        Ok(())
    }

    /// Register several commands in order; a later entry replaces an earlier
    /// one with the same name.
    pub fn register_all(&mut self, commands: Vec<SlashCommand>) -> Result<()> {
        for command in commands {
            self.register(command)?;
        }
        Ok(())
    }

    /// Dispatch one submitted line. Returns `true` only when a registered
    /// command ran. Input that does not start with the command marker is
    /// ignored with no output; an unrecognized name (including the empty
    /// name after a bare `/`) emits a single not-found line.
    pub fn process(&self, input: &str) -> bool {
        let trimmed = input.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return false;
        };

        let (name, args) = match rest.char_indices().find(|(_, ch)| ch.is_whitespace()) {
            Some((idx, ch)) => (&rest[..idx], rest[idx + ch.len_utf8()..].trim()),
            None => (rest, ""),
        };

        match self.commands.iter().find(|cmd| cmd.name == name) {
            Some(command) => {
                let ctx = CommandContext { registry: self };
                (command.handler)(args, &ctx);
                true
            }
            None => {
                self.show_output(vec![format!(
                    "Command not found: /{name}. Type /help to see available commands."
                )]);
                false
            }
        }
    }

    pub fn show_output(&self, lines: Vec<String>) {
        let _ = self.output_tx.send(CommandOutput::Lines(lines));
    }
}
