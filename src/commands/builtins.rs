use super::{CommandOutput, SlashCommand};
use crate::api::router::ProviderRouter;
use crate::api::ApiProvider;
use crate::state::SessionHandle;
use std::time::Duration;

/// Delay between the farewell line and process exit, so the farewell is
/// observably flushed.
const EXIT_FLUSH_DELAY: Duration = Duration::from_millis(100);

/// The built-in command set. Always registered at startup; a caller may
/// replace individual entries by re-registering the same name.
pub fn builtin_commands(router: &ProviderRouter, session: &SessionHandle) -> Vec<SlashCommand> {
    vec![
        help_command(),
        clear_command(),
        providers_command(),
        setprovider_command(router.clone()),
        currentprovider_command(router.clone()),
        listmodels_command(router.clone()),
        setmodel_command(router.clone(), session.clone()),
        currentmodel_command(session.clone()),
        exit_command(),
    ]
}

fn help_command() -> SlashCommand {
    SlashCommand::new("help", "Show available commands", |_args, ctx| {
        let lines = ctx
            .command_summaries()
            .into_iter()
            .map(|(name, description)| format!("/{name} - {description}"))
            .collect();
        ctx.show_output(lines);
    })
}

fn clear_command() -> SlashCommand {
    SlashCommand::new("clear", "Clear the terminal", |_args, ctx| {
        ctx.clear_display();
    })
}

fn providers_command() -> SlashCommand {
    SlashCommand::new("providers", "List available API providers", |_args, ctx| {
        let mut lines = vec!["Available API providers:".to_string()];
        lines.extend(ApiProvider::ALL.iter().map(|p| p.to_string()));
        ctx.show_output(lines);
    })
}

fn setprovider_command(router: ProviderRouter) -> SlashCommand {
    SlashCommand::new(
        "setprovider",
        "Set the preferred API provider",
        move |args, ctx| match ApiProvider::parse(args) {
            Some(provider) => {
                router.set_preferred_provider(provider);
                ctx.show_output(vec![format!("Preferred provider set to {provider}")]);
            }
            None => {
                let available = ApiProvider::ALL.map(|p| p.as_str()).join(", ");
                ctx.show_output(vec![format!(
                    "Invalid provider: {args}. Available: {available}"
                )]);
            }
        },
    )
}

fn currentprovider_command(router: ProviderRouter) -> SlashCommand {
    SlashCommand::new(
        "currentprovider",
        "Show the current API provider",
        move |_args, ctx| {
            ctx.show_output(vec![format!(
                "Current provider: {}",
                router.preferred_provider()
            )]);
        },
    )
}

fn listmodels_command(router: ProviderRouter) -> SlashCommand {
    SlashCommand::new(
        "listmodels",
        "List models available from the current provider",
        move |_args, ctx| {
            let router = router.clone();
            let tx = ctx.output_sender();
            tokio::spawn(async move {
                let provider = router.preferred_provider();
                let lines = match router.model_manager_for(provider) {
                    None => vec![format!(
                        "The current provider ({provider}) does not support model management."
                    )],
                    Some(manager) => match manager.list_models().await {
                        Ok(models) => {
                            let mut lines = vec!["Available models:".to_string()];
                            lines.extend(models);
                            lines
                        }
                        Err(err) => vec![format!("Error listing models: {err}")],
                    },
                };
                let _ = tx.send(CommandOutput::Lines(lines));
            });
        },
    )
}

fn setmodel_command(router: ProviderRouter, session: SessionHandle) -> SlashCommand {
    SlashCommand::new("setmodel", "Set the current model", move |args, ctx| {
        if args.is_empty() {
            ctx.show_output(vec![
                "Model key is required. Usage: /setmodel modelKey".to_string()
            ]);
            return;
        }
        session.set_selected_model(args);
        if let Some(manager) = router.model_manager_for(router.preferred_provider()) {
            manager.set_current_model(args);
        }
        ctx.show_output(vec![format!("Current model set to {args}")]);
    })
}

fn currentmodel_command(session: SessionHandle) -> SlashCommand {
    SlashCommand::new("currentmodel", "Show the current model", move |_args, ctx| {
        let model = session.selected_model();
        let shown = if model.is_empty() { "none" } else { model.as_str() };
        ctx.show_output(vec![format!("Current model: {shown}")]);
    })
}

fn exit_command() -> SlashCommand {
    SlashCommand::new("exit", "Exit the application", |_args, ctx| {
        ctx.show_output(vec!["Exiting application...".to_string()]);
        tokio::spawn(async {
            tokio::time::sleep(EXIT_FLUSH_DELAY).await;
            let _ = crate::terminal::restore();
            std::process::exit(0);
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandRegistry;
    use crate::config::Config;
    use crate::state::SessionState;
    use tokio::sync::mpsc;

    fn test_setup() -> (
        CommandRegistry,
        mpsc::UnboundedReceiver<CommandOutput>,
        ProviderRouter,
        SessionHandle,
    ) {
        let config = Config {
            provider: ApiProvider::LmStudio,
            model: "llama-3.2-3b-instruct".to_string(),
            lmstudio_api_url: "http://localhost:1234/v1".to_string(),
            lmstudio_api_key: None,
            send_context: true,
            mock_latency_ms: 0,
        };
        let session = SessionHandle::new(SessionState::new(config.provider, &config.model));
        let router = ProviderRouter::new(&config, session.clone());
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = CommandRegistry::new(tx);
        registry
            .register_all(builtin_commands(&router, &session))
            .unwrap();
        (registry, rx, router, session)
    }

    fn expect_lines(rx: &mut mpsc::UnboundedReceiver<CommandOutput>) -> Vec<String> {
        match rx.try_recv().expect("output") {
            CommandOutput::Lines(lines) => lines,
            other => panic!("expected lines, got {other:?}"),
        }
    }

    #[test]
    fn test_help_lists_all_builtins_in_registration_order() {
        let (registry, mut rx, _router, _session) = test_setup();
        assert!(registry.process("/help"));
        let lines = expect_lines(&mut rx);
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("/help - "));
        assert!(lines.iter().any(|l| l.starts_with("/clear - ")));
        assert!(lines.iter().any(|l| l.starts_with("/exit - ")));
    }

    #[test]
    fn test_clear_emits_clear_display() {
        let (registry, mut rx, _router, _session) = test_setup();
        assert!(registry.process("/clear"));
        assert_eq!(rx.try_recv().unwrap(), CommandOutput::ClearDisplay);
    }

    #[test]
    fn test_providers_lists_enumerated_identifiers() {
        let (registry, mut rx, _router, _session) = test_setup();
        assert!(registry.process("/providers"));
        assert_eq!(
            expect_lines(&mut rx),
            [
                "Available API providers:",
                "claude",
                "lmstudio",
                "ollama",
                "openai"
            ]
        );
    }

    #[test]
    fn test_setprovider_matches_case_insensitively() {
        let (registry, mut rx, router, _session) = test_setup();
        assert!(registry.process("/setprovider OPENAI"));
        assert_eq!(expect_lines(&mut rx), ["Preferred provider set to openai"]);
        assert_eq!(router.preferred_provider(), ApiProvider::OpenAi);
    }

    #[test]
    fn test_setprovider_rejects_unknown_provider() {
        let (registry, mut rx, router, _session) = test_setup();
        assert!(registry.process("/setprovider invalidProvider"));
        assert_eq!(
            expect_lines(&mut rx),
            ["Invalid provider: invalidProvider. Available: claude, lmstudio, ollama, openai"]
        );
        assert_eq!(router.preferred_provider(), ApiProvider::LmStudio);
    }

    #[test]
    fn test_currentprovider_reports_selection() {
        let (registry, mut rx, router, _session) = test_setup();
        router.set_preferred_provider(ApiProvider::Ollama);
        assert!(registry.process("/currentprovider"));
        assert_eq!(expect_lines(&mut rx), ["Current provider: ollama"]);
    }

    #[tokio::test]
    async fn test_listmodels_reports_unsupported_provider() {
        let (registry, mut rx, router, _session) = test_setup();
        router.set_preferred_provider(ApiProvider::OpenAi);
        assert!(registry.process("/listmodels"));
        let output = rx.recv().await.unwrap();
        assert_eq!(
            output,
            CommandOutput::Lines(vec![
                "The current provider (openai) does not support model management.".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_listmodels_failure_reports_single_error_line() {
        // Port 1 refuses connections, so the listing fails fast instead of
        // propagating out of the spawned task.
        let config = Config {
            provider: ApiProvider::LmStudio,
            model: "llama-3.2-3b-instruct".to_string(),
            lmstudio_api_url: "http://127.0.0.1:1/v1".to_string(),
            lmstudio_api_key: None,
            send_context: true,
            mock_latency_ms: 0,
        };
        let session = SessionHandle::new(SessionState::new(config.provider, &config.model));
        let router = ProviderRouter::new(&config, session.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut registry = CommandRegistry::new(tx);
        registry
            .register_all(builtin_commands(&router, &session))
            .unwrap();

        assert!(registry.process("/listmodels"));
        let output = rx.recv().await.unwrap();
        match output {
            CommandOutput::Lines(lines) => {
                assert_eq!(lines.len(), 1);
                assert!(lines[0].starts_with("Error listing models: "));
            }
            other => panic!("expected lines, got {other:?}"),
        }
    }

    #[test]
    fn test_setmodel_requires_argument() {
        let (registry, mut rx, _router, session) = test_setup();
        assert!(registry.process("/setmodel"));
        assert_eq!(
            expect_lines(&mut rx),
            ["Model key is required. Usage: /setmodel modelKey"]
        );
        assert_eq!(session.selected_model(), "llama-3.2-3b-instruct");
    }

    #[test]
    fn test_setmodel_updates_session_and_capability() {
        let (registry, mut rx, router, session) = test_setup();
        assert!(registry.process("/setmodel gpt-4"));
        assert_eq!(expect_lines(&mut rx), ["Current model set to gpt-4"]);
        assert_eq!(session.selected_model(), "gpt-4");
        let manager = router.model_manager_for(ApiProvider::LmStudio).unwrap();
        assert_eq!(manager.get_current_model(), "gpt-4");
    }

    #[test]
    fn test_currentmodel_reports_model_or_none() {
        let (registry, mut rx, _router, session) = test_setup();
        assert!(registry.process("/currentmodel"));
        assert_eq!(
            expect_lines(&mut rx),
            ["Current model: llama-3.2-3b-instruct"]
        );

        session.set_selected_model("");
        assert!(registry.process("/currentmodel"));
        assert_eq!(expect_lines(&mut rx), ["Current model: none"]);
    }
}
