#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CachedTimeline;
use crate::domain::models::SessionId;
use crate::domain::services::TimelineCache;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_cached_timeline(cached: &CachedTimeline) -> String {
    let mut res = format!("- (Session: {}) {}", cached.key, cached.saved_at);

    if !cached.messages.is_empty() {
        let mut line = cached.messages[0]
            .content
            .split('\n')
            .collect::<Vec<_>>()[0]
            .to_string();

        if line.len() >= 70 {
            // Truncate on a char boundary, byte 67 may fall inside a
            // multibyte character.
            let cut = line
                .char_indices()
                .take_while(|(idx, _)| return *idx <= 67)
                .last()
                .map(|(idx, _)| return idx)
                .unwrap_or(0);
            line = format!("{}...", &line[..cut]);
        }
        res = format!("{res}, {line}");
    }

    return res;
}

async fn print_sessions_list() -> Result<()> {
    let mut sessions = TimelineCache::default()
        .list()
        .await?
        .iter()
        .map(|cached| {
            return format_cached_timeline(cached);
        })
        .collect::<Vec<String>>();

    sessions.reverse();

    if sessions.is_empty() {
        println!("There are no cached sessions. You should start your first conversation!");
    } else {
        println!("{}", sessions.join("\n"));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all cached sessions.")
        .arg(
            clap::Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all cached sessions.")
                .num_args(0),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["session-id", "all"])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage locally cached sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the sessions cache directory path."))
        .subcommand(
            Command::new("list").about("List all cached sessions with their ids and first message."),
        )
        .subcommand(subcommand_sessions_delete());
}

fn arg_agent_url() -> Arg {
    return Arg::new(ConfigKey::AgentURL.to_string())
        .short('a')
        .long(ConfigKey::AgentURL.to_string())
        .env("MATCHA_AGENT_URL")
        .num_args(1)
        .help(format!(
            "The URL of the agent service to connect to. [default: {}]",
            Config::default(ConfigKey::AgentURL)
        ));
}

fn arg_agent_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::AgentHealthCheckTimeout.to_string())
        .long(ConfigKey::AgentHealthCheckTimeout.to_string())
        .env("MATCHA_AGENT_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(
            format!("Time to wait in milliseconds before timing out when doing a healthcheck for the agent service. [default: {}]", Config::default(ConfigKey::AgentHealthCheckTimeout)),
        );
}

fn arg_agent_id() -> Arg {
    return Arg::new(ConfigKey::AgentID.to_string())
        .long(ConfigKey::AgentID.to_string())
        .env("MATCHA_AGENT_ID")
        .num_args(1)
        .help("The ID of the agent to chat with, when the service hosts more than one.");
}

fn arg_session_id() -> Arg {
    return Arg::new(ConfigKey::SessionID.to_string())
        .short('i')
        .long(ConfigKey::SessionID.to_string())
        .env("MATCHA_SESSION_ID")
        .num_args(1)
        .help("Resume a previous conversation by its session ID.");
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Start or resume a chat session.")
        .arg(arg_agent_url())
        .arg(arg_agent_health_check_timeout())
        .arg(arg_agent_id())
        .arg(arg_session_id());
}

pub fn build() -> Command {
    let commands_text = ui::help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("CHAT {line}")).underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("matcha")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_sessions())
        .arg(arg_agent_url())
        .arg(arg_agent_health_check_timeout())
        .arg(arg_agent_id())
        .arg(arg_session_id())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("MATCHA_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .short('u')
                .long(ConfigKey::Username.to_string())
                .env("MATCHA_USERNAME")
                .num_args(1)
                .help("Your user name displayed next to your messages.")
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("sessions", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("dir", _)) => {
                let dir = TimelineCache::default()
                    .cache_dir
                    .to_string_lossy()
                    .to_string();
                println!("{dir}");
                return Ok(false);
            }
            Some(("list", _)) => {
                print_sessions_list().await?;
                return Ok(false);
            }
            Some(("delete", delete_matches)) => {
                if let Some(session_id) = delete_matches.get_one::<String>("session-id") {
                    // "new" is the unsaved-conversation sentinel, not an id.
                    let mut key = session_id.to_string();
                    if key != "new" {
                        key = SessionId::new(session_id).wire().to_string();
                    }
                    TimelineCache::default().delete(&key).await?;
                    println!("Deleted session {session_id}");
                } else if delete_matches.get_one::<bool>("all").is_some() {
                    TimelineCache::default().delete_all().await?;
                    println!("Deleted all cached sessions");
                } else {
                    subcommand_sessions_delete().print_long_help()?;
                }
                return Ok(false);
            }
            _ => {
                subcommand_sessions().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
