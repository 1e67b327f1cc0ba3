use crate::api::router::ProviderRouter;
use crate::commands::builtins::builtin_commands;
use crate::commands::{CommandOutput, CommandRegistry};
use crate::config::Config;
use crate::input::{InputAction, LineEditor};
use crate::state::{SessionHandle, SessionState};
use crate::types::ChatTurn;
use crate::{terminal, ui};
use anyhow::Result;
use std::collections::HashSet;
use std::io::Write;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

/// Completion of one provider request. Replies are applied in completion
/// order, not submission order.
struct ProviderReply {
    request_id: u64,
    result: Result<String>,
}

/// Top-level session controller.
///
/// Owns the line editor, the command registry, the provider router, and the
/// conversation transcript. One `tokio::select!` loop drives everything:
/// raw stdin bytes go through the editor synchronously, while provider
/// requests and async command output come back over channels so typing is
/// never blocked on a request in flight.
pub struct App {
    editor: LineEditor,
    session: SessionHandle,
    router: ProviderRouter,
    registry: CommandRegistry,
    transcript: Vec<ChatTurn>,
    command_rx: mpsc::UnboundedReceiver<CommandOutput>,
    reply_tx: mpsc::UnboundedSender<ProviderReply>,
    reply_rx: mpsc::UnboundedReceiver<ProviderReply>,
    next_request_id: u64,
    pending_requests: HashSet<u64>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let session = SessionHandle::new(SessionState::new(config.provider, &config.model));
        let router = ProviderRouter::new(&config, session.clone());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let mut registry = CommandRegistry::new(command_tx);
        registry.register_all(builtin_commands(&router, &session))?;

        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        Ok(Self {
            editor: LineEditor::new(),
            session,
            router,
            registry,
            transcript: Vec::new(),
            command_rx,
            reply_tx,
            reply_rx,
            next_request_id: 0,
            pending_requests: HashSet::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        terminal::setup()?;
        let result = self.event_loop().await;
        terminal::restore()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut stdin = tokio::io::stdin();
        let mut out = std::io::stdout();
        let mut buf = [0u8; 256];
        // Holds the trailing bytes of a multi-byte character split across
        // reads.
        let mut pending: Vec<u8> = Vec::new();

        ui::print_output_line(&mut out, "parley — terminal chat. Type /help for commands.")?;
        self.draw_prompt(&mut out)?;

        loop {
            tokio::select! {
                read = stdin.read(&mut buf) => {
                    let n = read?;
                    if n == 0 {
                        break;
                    }
                    pending.extend_from_slice(&buf[..n]);
                    let chunk = take_complete_utf8(&mut pending);
                    if chunk.is_empty() {
                        continue;
                    }
                    match self.editor.handle_bytes(&chunk) {
                        InputAction::None => {}
                        InputAction::Exit => {
                            // Hard exit: in-flight requests are abandoned.
                            let _ = terminal::restore();
                            std::process::exit(0);
                        }
                        InputAction::Submit(text) => self.handle_submit(text, &mut out)?,
                    }
                    self.draw_prompt(&mut out)?;
                }
                Some(output) = self.command_rx.recv() => {
                    self.apply_command_output(output, &mut out)?;
                    self.draw_prompt(&mut out)?;
                }
                Some(reply) = self.reply_rx.recv() => {
                    self.apply_reply(reply, &mut out)?;
                    self.draw_prompt(&mut out)?;
                }
            }
        }

        Ok(())
    }

    /// Route one submitted line: slash commands go to the registry, anything
    /// else is sent to the preferred provider without blocking the loop.
    /// Multiple submissions may be outstanding at once; each resolves
    /// independently.
    fn handle_submit(&mut self, text: String, out: &mut impl Write) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        if trimmed.starts_with('/') {
            ui::print_output_line(out, &format!("> {trimmed}"))?;
            self.registry.process(&text);
            return Ok(());
        }

        ui::print_output_line(out, &format!("You: {trimmed}"))?;
        // Context is the conversation up to (not including) this prompt; the
        // provider client appends the prompt itself.
        let context = self.transcript.clone();
        self.transcript.push(ChatTurn::user(trimmed));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_requests.insert(request_id);

        let prompt = trimmed.to_string();
        let router = self.router.clone();
        let reply_tx = self.reply_tx.clone();
        tokio::spawn(async move {
            let result = router.send_prompt(&prompt, &context).await;
            let _ = reply_tx.send(ProviderReply { request_id, result });
        });
        Ok(())
    }

    fn apply_command_output(&mut self, output: CommandOutput, out: &mut impl Write) -> Result<()> {
        match output {
            CommandOutput::Lines(lines) => {
                for line in lines {
                    ui::print_output_line(out, &line)?;
                }
            }
            CommandOutput::ClearDisplay => {
                self.transcript.clear();
                ui::clear_display(out)?;
            }
        }
        Ok(())
    }

    fn apply_reply(&mut self, reply: ProviderReply, out: &mut impl Write) -> Result<()> {
        self.pending_requests.remove(&reply.request_id);
        match reply.result {
            Ok(response) => {
                self.transcript.push(ChatTurn::assistant(response.as_str()));
                for line in response.lines() {
                    ui::print_output_line(out, line)?;
                }
            }
            Err(err) => ui::print_output_line(out, &format!("Error: {err}"))?,
        }
        Ok(())
    }

    fn draw_prompt(&self, out: &mut impl Write) -> Result<()> {
        let prefix = ui::status_prefix(
            self.session.preferred_provider().as_str(),
            &self.session.selected_model(),
            !self.pending_requests.is_empty(),
        );
        ui::draw_prompt(out, &prefix, self.editor.text(), self.editor.cursor())?;
        Ok(())
    }
}

/// Split off the longest decodable prefix of `pending`, leaving any trailing
/// incomplete multi-byte sequence for the next read. Bytes that can never
/// form valid UTF-8 are replaced rather than held forever.
fn take_complete_utf8(pending: &mut Vec<u8>) -> String {
    match std::str::from_utf8(pending) {
        Ok(valid) => {
            let chunk = valid.to_string();
            pending.clear();
            chunk
        }
        Err(err) if err.error_len().is_none() => {
            let valid_len = err.valid_up_to();
            let chunk = String::from_utf8_lossy(&pending[..valid_len]).into_owned();
            pending.drain(..valid_len);
            chunk
        }
        Err(_) => {
            let chunk = String::from_utf8_lossy(pending).into_owned();
            pending.clear();
            chunk
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiProvider;
    use crate::types::Role;

    fn test_app() -> App {
        let config = Config {
            provider: ApiProvider::Claude,
            model: "test-model".to_string(),
            lmstudio_api_url: "http://localhost:1234/v1".to_string(),
            lmstudio_api_key: None,
            send_context: true,
            mock_latency_ms: 0,
        };
        App::new(config).expect("app")
    }

    #[tokio::test]
    async fn test_plain_submission_resolves_through_router() {
        let mut app = test_app();
        let mut out = Vec::new();

        app.handle_submit("hello".to_string(), &mut out).unwrap();
        assert_eq!(app.pending_requests.len(), 1);

        let reply = app.reply_rx.recv().await.unwrap();
        app.apply_reply(reply, &mut out).unwrap();

        assert!(app.pending_requests.is_empty());
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].role, Role::User);
        assert_eq!(app.transcript[1].role, Role::Assistant);
        assert_eq!(
            app.transcript[1].content,
            "Response from Claude for prompt: \"hello\""
        );
    }

    #[tokio::test]
    async fn test_concurrent_submissions_resolve_independently() {
        let mut app = test_app();
        let mut out = Vec::new();

        app.handle_submit("one".to_string(), &mut out).unwrap();
        app.handle_submit("two".to_string(), &mut out).unwrap();
        assert_eq!(app.pending_requests.len(), 2);

        for _ in 0..2 {
            let reply = app.reply_rx.recv().await.unwrap();
            app.apply_reply(reply, &mut out).unwrap();
        }
        assert!(app.pending_requests.is_empty());
        // Two user turns and two assistant turns, appended as completed.
        assert_eq!(app.transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_command_submission_routes_to_registry() {
        let mut app = test_app();
        let mut out = Vec::new();

        app.handle_submit("/currentprovider".to_string(), &mut out)
            .unwrap();
        assert!(app.pending_requests.is_empty());
        assert_eq!(
            app.command_rx.recv().await.unwrap(),
            CommandOutput::Lines(vec!["Current provider: claude".to_string()])
        );
    }

    #[tokio::test]
    async fn test_clear_command_empties_transcript() {
        let mut app = test_app();
        let mut out = Vec::new();
        app.transcript.push(ChatTurn::user("old"));

        app.handle_submit("/clear".to_string(), &mut out).unwrap();
        let output = app.command_rx.recv().await.unwrap();
        app.apply_command_output(output, &mut out).unwrap();
        assert!(app.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_failed_request_appends_single_error_line() {
        // Port 1 refuses connections, so the real client fails fast.
        let config = Config {
            provider: ApiProvider::LmStudio,
            model: "test-model".to_string(),
            lmstudio_api_url: "http://127.0.0.1:1/v1".to_string(),
            lmstudio_api_key: None,
            send_context: true,
            mock_latency_ms: 0,
        };
        let mut app = App::new(config).expect("app");
        let mut out = Vec::new();

        app.handle_submit("hello".to_string(), &mut out).unwrap();
        let reply = app.reply_rx.recv().await.unwrap();
        assert!(reply.result.is_err());
        app.apply_reply(reply, &mut out).unwrap();

        assert!(app.pending_requests.is_empty());
        // The user turn stays; no assistant turn is recorded for a failure.
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].role, Role::User);
        let rendered = String::from_utf8(out).unwrap();
        let error_lines: Vec<&str> = rendered
            .lines()
            .filter(|line| line.contains("Error: "))
            .collect();
        assert_eq!(error_lines.len(), 1);
    }

    #[test]
    fn test_take_complete_utf8_holds_split_sequence() {
        let multibyte = "é".as_bytes();
        let mut pending = vec![b'a', multibyte[0]];
        assert_eq!(take_complete_utf8(&mut pending), "a");
        assert_eq!(pending, [multibyte[0]]);
        pending.push(multibyte[1]);
        assert_eq!(take_complete_utf8(&mut pending), "é");
        assert!(pending.is_empty());
    }

    #[test]
    fn test_take_complete_utf8_replaces_undecodable_bytes() {
        let mut pending = vec![0xFF, b'x'];
        assert_eq!(take_complete_utf8(&mut pending), "\u{FFFD}x");
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_blank_submission_is_ignored() {
        let mut app = test_app();
        let mut out = Vec::new();
        app.handle_submit("   ".to_string(), &mut out).unwrap();
        assert!(app.pending_requests.is_empty());
        assert!(app.transcript.is_empty());
        assert!(out.is_empty());
    }
}
