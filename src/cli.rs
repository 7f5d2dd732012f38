// ABOUTME: Command-line definition — global flags and the non-interactive subcommands.
// ABOUTME: With no subcommand the full-screen chat opens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;
use crate::webhook::HttpMethod;

#[derive(Debug, Parser)]
#[command(name = "hookchat", version, about = "Chat with a workflow webhook from your terminal")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Webhook URL to use instead of the stored one
    #[arg(long, global = true, env = "HOOKCHAT_WEBHOOK_URL", value_name = "URL")]
    pub webhook_url: Option<String>,

    /// HTTP method for webhook calls
    #[arg(long, global = true, value_enum)]
    pub method: Option<HttpMethod>,

    /// Directory for the state file and log
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            webhook_url: self.webhook_url.clone(),
            method: self.method,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one message and print the reply
    Send {
        message: String,
        /// Session to send in (defaults to the current one)
        #[arg(long, conflicts_with = "new")]
        session: Option<String>,
        /// Start a new session for this message
        #[arg(long)]
        new: bool,
    },
    /// Inspect or delete saved sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },
    /// Show the effective configuration or store a webhook URL
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List sessions, most recent first
    List,
    /// Print every message of a session
    Show { id: String },
    /// Delete a session
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print paths and webhook settings
    Show,
    /// Store a new webhook URL
    SetUrl { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["hookchat"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_send_with_global_flags() {
        let cli = Cli::try_parse_from([
            "hookchat",
            "send",
            "hello there",
            "--new",
            "--method",
            "get",
            "--webhook-url",
            "http://x/hook",
        ])
        .unwrap();
        assert_eq!(cli.method, Some(HttpMethod::Get));
        assert_eq!(cli.webhook_url.as_deref(), Some("http://x/hook"));
        match cli.command {
            Some(Command::Send { message, new, session }) => {
                assert_eq!(message, "hello there");
                assert!(new);
                assert!(session.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn session_and_new_conflict() {
        assert!(Cli::try_parse_from(["hookchat", "send", "hi", "--new", "--session", "abc"]).is_err());
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["hookchat", "sessions", "delete", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Sessions { action: SessionsCommand::Delete { ref id } }) if id == "abc"
        ));
        let cli = Cli::try_parse_from(["hookchat", "config", "set-url", "http://y"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config { action: ConfigCommand::SetUrl { .. } })
        ));
    }
}
