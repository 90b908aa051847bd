use std::io;
use std::io::Write;

use anyhow::Result;
use tokio::io::stdin;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::services::SessionTimeline;

pub fn help_text() -> String {
    return r#"COMMANDS:
- /help (/h): Show this help menu
- /new (/n, /clear): Start a new conversation, clearing the current one
- /quit (/q, /exit): Quit"#
        .to_string();
}

fn print_message(msg: &Message) {
    let label = match msg.role {
        Role::User => Paint::cyan(Config::get(ConfigKey::Username)).bold().to_string(),
        Role::Assistant => {
            let name = msg
                .agent_name
                .clone()
                .unwrap_or_else(|| return "Agent".to_string());
            Paint::green(name).bold().to_string()
        }
        Role::System => Paint::new("System".to_string()).dimmed().to_string(),
    };

    println!("{label}: {}", msg.content);
}

fn print_error(error: &str) {
    eprintln!("{}", Paint::red(error));
}

fn print_notice(notice: &str) {
    println!("{}", Paint::new(notice).dimmed());
}

fn prompt() -> Result<()> {
    print!("{} ", Paint::new(">").bold());
    io::stdout().flush()?;
    return Ok(());
}

fn display_session(timeline: &SessionTimeline) -> Option<String> {
    return timeline
        .state()
        .session
        .as_ref()
        .map(|id| return id.display().to_string());
}

/// Runs the chat loop until the user quits or stdin closes. The timeline is
/// hydrated from the configured session id (or the unsaved sentinel) before
/// the first prompt.
pub async fn start(timeline: &mut SessionTimeline) -> Result<()> {
    let session_id = Config::get(ConfigKey::SessionID);
    let initial = if session_id.is_empty() {
        None
    } else {
        Some(session_id.as_str())
    };

    timeline.hydrate(initial).await;

    if timeline.messages().is_empty() {
        print_notice("Hey there! What can I do for you? (/help for commands)");
    } else {
        for msg in timeline.messages() {
            print_message(msg);
        }
    }

    if let Some(error) = &timeline.state().error {
        print_error(error);
    }

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Some(command) = SlashCommand::parse(&line) {
            if command.is_quit() {
                break;
            }
            if command.is_new() {
                timeline.clear_messages().await;
                print_notice("Started a new conversation.");
                continue;
            }
            if command.is_help() {
                println!("{}", help_text());
                continue;
            }
        }

        let before_session = display_session(timeline);
        let before_len = timeline.messages().len();

        timeline.send_message(&line).await;

        if let Some(error) = &timeline.state().error {
            print_error(error);
            continue;
        }

        // Skip echoing the user's own optimistic message back.
        for msg in timeline
            .messages()
            .iter()
            .skip(before_len + 1)
        {
            print_message(msg);
        }

        let after_session = display_session(timeline);
        if after_session != before_session {
            if let Some(session) = after_session {
                print_notice(&format!(
                    "Conversation saved as session {session}. Resume it with `matcha chat -i {session}`."
                ));
            }
        }
    }

    return Ok(());
}
