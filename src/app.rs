// ABOUTME: App orchestrator — wires together config, persisted state, dispatcher, and TUI.
// ABOUTME: Runs the crossterm event stream and dispatcher events in one select loop.

use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::controller::{ChatController, ControllerError, ControllerSettings};
use crate::dispatch::{DispatchEvent, DispatchRequest, run_dispatcher};
use crate::session::{KvStore, load_state};
use crate::tui::input::{InputResult, handle_key, handle_paste};
use crate::tui::state::{TextBuffer, TuiState};
use crate::tui::ui;
use crate::webhook::{HttpWebhook, Webhook, WebhookError};

/// Redraw cadence for the typing indicator and notice expiry.
const TICK: Duration = Duration::from_millis(200);

/// Open the persisted state and build a controller over it.
///
/// `url_override` (from the command line or environment) beats the stored URL,
/// which beats the config default.
pub fn open_controller(config: &Config, url_override: Option<&str>) -> anyhow::Result<ChatController> {
    let mut kv = KvStore::open(config.state_path())?;
    let state = load_state(&mut kv, &config.webhook.url, &config.chat.greeting);
    let webhook_url = match url_override {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => state.webhook_url,
    };
    info!(
        "loaded {} session(s) from {}",
        state.store.len(),
        kv.path().display()
    );

    Ok(ChatController::new(
        state.store,
        webhook_url,
        ControllerSettings {
            method: config.webhook.method,
            user_id: config.webhook.user_id.clone(),
            greeting: config.chat.greeting.clone(),
        },
        Some(kv),
    ))
}

/// Top-level interactive application.
pub struct App {
    config: Config,
    url_override: Option<String>,
}

impl App {
    pub fn new(config: Config, url_override: Option<String>) -> Self {
        Self {
            config,
            url_override,
        }
    }

    /// Run the application: load state, start the dispatcher, and drive the TUI until quit.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut controller = open_controller(&self.config, self.url_override.as_deref())?;
        let webhook: Arc<dyn Webhook> = Arc::new(HttpWebhook::new(self.config.webhook.timeout())?);

        let (request_tx, request_rx) = mpsc::channel::<DispatchRequest>(16);
        let (event_tx, mut event_rx) = mpsc::channel::<DispatchEvent>(16);
        let dispatcher = tokio::spawn(run_dispatcher(webhook, request_rx, event_tx));

        let mut terminal = ratatui::init();
        if let Err(e) = crossterm::execute!(stdout(), EnableBracketedPaste) {
            warn!("bracketed paste unavailable: {}", e);
        }

        let mut state = TuiState::new();
        let result = event_loop(
            &mut terminal,
            &mut state,
            &mut controller,
            &request_tx,
            &mut event_rx,
        )
        .await;

        let _ = crossterm::execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        let _ = request_tx.send(DispatchRequest::Quit).await;
        drop(request_tx);
        let _ = dispatcher.await;

        if result.is_ok() {
            print_exit_screen(&state, &controller);
        }
        result
    }
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut TuiState,
    controller: &mut ChatController,
    request_tx: &mpsc::Sender<DispatchRequest>,
    event_rx: &mut mpsc::Receiver<DispatchEvent>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal.draw(|frame| ui::render(frame, state, controller))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let action = handle_key(state, controller, key);
                    if apply_action(action, state, controller, request_tx).await {
                        break;
                    }
                }
                Some(Ok(Event::Paste(text))) => handle_paste(state, &text),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(DispatchEvent::Completed { session_id, outcome }) = event_rx.recv() => {
                let completion = controller.finish_send(&session_id, outcome);
                debug!("exchange completed: {:?}", completion);
            }
            _ = tick.tick() => {
                state.expire_notice(Instant::now());
            }
        }

        for notice in controller.drain_notices() {
            state.show_notice(notice);
        }
    }

    Ok(())
}

/// Apply a user action. Returns true when the app should quit.
async fn apply_action(
    action: InputResult,
    state: &mut TuiState,
    controller: &mut ChatController,
    request_tx: &mpsc::Sender<DispatchRequest>,
) -> bool {
    match action {
        InputResult::None => {}
        InputResult::Quit => return true,
        InputResult::Send(text) => match controller.begin_send(&text) {
            Ok(pending) => {
                let session_id = pending.session_id.clone();
                let request = DispatchRequest::Send {
                    session_id: pending.session_id,
                    request: pending.request,
                };
                if request_tx.send(request).await.is_err() {
                    controller.finish_send(
                        &session_id,
                        Err(WebhookError::Transport("dispatcher stopped".to_string())),
                    );
                }
            }
            Err(ControllerError::WebhookNotConfigured) => {
                // Give the text back so it is not lost.
                state.input = TextBuffer::with_text(&text);
            }
            Err(e) => debug!("send rejected: {}", e),
        },
        InputResult::NewSession => {
            controller.new_session();
        }
        InputResult::SelectSession(id) => {
            if let Err(e) = controller.select_session(&id) {
                warn!("select failed: {}", e);
            }
        }
        InputResult::DeleteSession(id) => {
            if let Err(e) = controller.delete_session(&id) {
                warn!("delete failed: {}", e);
            }
            state.clamp_sidebar(controller.sessions().len());
        }
        InputResult::SaveWebhookUrl(url) => controller.set_webhook_url(&url),
    }
    false
}

/// Print a farewell screen after the TUI exits.
fn print_exit_screen(state: &TuiState, controller: &ChatController) {
    let elapsed_secs = state.session_start.elapsed().as_secs();
    let elapsed = if elapsed_secs >= 3600 {
        format!("{}h {:02}m", elapsed_secs / 3600, (elapsed_secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", elapsed_secs / 60, elapsed_secs % 60)
    };
    let sessions = controller.sessions().len();

    println!();
    println!("  \x1b[1mhookchat closed.\x1b[0m");
    println!("  Ran for {elapsed}; {sessions} conversation(s) saved.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            storage: StorageConfig {
                data_dir: Some(dir.to_path_buf()),
            },
            ..Config::default()
        }
    }

    #[test]
    fn open_controller_seeds_default_url() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let c = open_controller(&config, None).unwrap();
        assert_eq!(c.webhook_url(), config.webhook.url);
        assert_eq!(c.sessions().len(), 1);
    }

    #[test]
    fn url_override_beats_stored_url() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        {
            let mut c = open_controller(&config, None).unwrap();
            c.set_webhook_url("http://stored/hook");
        }
        let c = open_controller(&config, None).unwrap();
        assert_eq!(c.webhook_url(), "http://stored/hook");
        let c = open_controller(&config, Some("http://cli/hook")).unwrap();
        assert_eq!(c.webhook_url(), "http://cli/hook");
        let c = open_controller(&config, Some("  ")).unwrap();
        assert_eq!(c.webhook_url(), "http://stored/hook");
    }

    #[tokio::test]
    async fn send_without_url_restores_input() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config_in(tmp.path());
        config.webhook.url = String::new();
        let mut c = open_controller(&config, None).unwrap();
        let mut state = TuiState::new();
        let (tx, _rx) = mpsc::channel(1);

        let quit = apply_action(InputResult::Send("hello".to_string()), &mut state, &mut c, &tx).await;
        assert!(!quit);
        assert_eq!(state.input.text, "hello");
        assert_eq!(c.drain_notices()[0].title, "Configuration needed");
    }

    #[tokio::test]
    async fn send_forwards_request_to_dispatcher() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = open_controller(&config_in(tmp.path()), Some("http://hook")).unwrap();
        let mut state = TuiState::new();
        let (tx, mut rx) = mpsc::channel(1);

        apply_action(InputResult::Send("ping".to_string()), &mut state, &mut c, &tx).await;
        assert!(c.is_loading());
        match rx.recv().await.unwrap() {
            DispatchRequest::Send { session_id, request } => {
                assert_eq!(Some(session_id.as_str()), c.current_session_id());
                assert_eq!(request.url, "http://hook");
                assert_eq!(request.payload.message, "ping");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_dispatcher_fails_the_send() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = open_controller(&config_in(tmp.path()), Some("http://hook")).unwrap();
        let mut state = TuiState::new();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        apply_action(InputResult::Send("ping".to_string()), &mut state, &mut c, &tx).await;
        assert!(!c.is_loading());
        let last = c.current_session().unwrap().messages.last().unwrap().clone();
        assert!(last.text.contains("dispatcher stopped"));
    }

    #[tokio::test]
    async fn quit_action_stops_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let mut c = open_controller(&config_in(tmp.path()), None).unwrap();
        let mut state = TuiState::new();
        let (tx, _rx) = mpsc::channel(1);
        assert!(apply_action(InputResult::Quit, &mut state, &mut c, &tx).await);
    }
}
