// ABOUTME: Non-interactive subcommands — one-shot send, session inspection, and config.
// ABOUTME: Share the controller and persisted state with the TUI.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use chrono::Utc;

use crate::app::open_controller;
use crate::cli::{Command, ConfigCommand, SessionsCommand};
use crate::config::Config;
use crate::controller::{ChatController, Completion};
use crate::tui::widgets::sidebar::format_relative;
use crate::webhook::{HttpWebhook, Webhook};

/// Run a subcommand, writing its output to stdout.
/// `config_path` is the file the config was loaded from (or would be).
pub async fn run(
    command: Command,
    config: &Config,
    config_path: &Path,
    url_override: Option<&str>,
) -> anyhow::Result<()> {
    let mut controller = open_controller(config, url_override)?;
    let mut out = std::io::stdout().lock();

    match command {
        Command::Send {
            message,
            session,
            new,
        } => {
            let webhook = HttpWebhook::new(config.webhook.timeout())?;
            send(&mut controller, &webhook, &message, session.as_deref(), new, &mut out).await
        }
        Command::Sessions { action } => match action {
            SessionsCommand::List => list_sessions(&controller, &mut out),
            SessionsCommand::Show { id } => show_session(&controller, &id, &mut out),
            SessionsCommand::Delete { id } => delete_session(&mut controller, &id, &mut out),
        },
        Command::Config { action } => match action {
            ConfigCommand::Show => show_config(config, config_path, &controller, &mut out),
            ConfigCommand::SetUrl { url } => set_url(&mut controller, &url, &mut out),
        },
    }
}

/// Send one message and print the reply. A failed exchange is an error.
pub async fn send(
    controller: &mut ChatController,
    webhook: &dyn Webhook,
    message: &str,
    session: Option<&str>,
    new: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if new {
        controller.new_session();
    } else if let Some(id) = session {
        controller.select_session(id)?;
    }

    let pending = controller.begin_send(message)?;
    let outcome = webhook.deliver(&pending.request).await;

    match controller.finish_send(&pending.session_id, outcome) {
        Completion::Replied(text) => writeln!(out, "{}", text)?,
        Completion::Acknowledged => writeln!(out, "Workflow started.")?,
        Completion::Failed(text) => bail!(text),
        Completion::Dropped => bail!("session {} disappeared", pending.session_id),
    }
    Ok(())
}

pub fn list_sessions(controller: &ChatController, out: &mut impl Write) -> anyhow::Result<()> {
    let now = Utc::now();
    let current = controller.current_session_id();
    for session in controller.sessions() {
        let marker = if current == Some(session.id.as_str()) { "*" } else { " " };
        writeln!(
            out,
            "{} {}  {}  ({} messages, {})",
            marker,
            session.id,
            session.title,
            session.message_count,
            format_relative(session.timestamp, now)
        )?;
    }
    Ok(())
}

pub fn show_session(controller: &ChatController, id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let session = controller
        .session(id)
        .with_context(|| format!("no session with id {}", id))?;

    writeln!(out, "{}", session.title)?;
    for message in &session.messages {
        let who = if message.is_user { "you" } else { "assistant" };
        let time = message
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        writeln!(out, "[{}] {}: {}", time, who, message.text)?;
    }
    Ok(())
}

pub fn delete_session(controller: &mut ChatController, id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    controller.delete_session(id)?;
    writeln!(out, "Deleted session {}", id)?;
    Ok(())
}

pub fn show_config(
    config: &Config,
    config_path: &Path,
    controller: &ChatController,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let url = if controller.webhook_url().is_empty() {
        "(not set)"
    } else {
        controller.webhook_url()
    };
    let timeout = config
        .webhook
        .timeout()
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    writeln!(out, "config file:  {}", config_path.display())?;
    writeln!(out, "state file:   {}", config.state_path().display())?;
    writeln!(out, "log file:     {}", config.log_path().display())?;
    writeln!(out, "webhook url:  {}", url)?;
    writeln!(out, "method:       {}", controller.method())?;
    writeln!(out, "user id:      {}", config.webhook.user_id)?;
    writeln!(out, "timeout:      {}", timeout)?;
    writeln!(out, "sessions:     {}", controller.sessions().len())?;
    Ok(())
}

pub fn set_url(controller: &mut ChatController, url: &str, out: &mut impl Write) -> anyhow::Result<()> {
    controller.set_webhook_url(url);
    writeln!(out, "Webhook URL saved: {}", controller.webhook_url())?;
    Ok(())
}
