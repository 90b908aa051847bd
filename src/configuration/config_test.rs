use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    let doc = toml_res.unwrap();
    assert_eq!(
        doc.get("agent-url").and_then(|v| return v.as_str()),
        Some("http://localhost:8000")
    );
    assert_eq!(
        doc.get("agent-health-check-timeout")
            .and_then(|v| return v.as_integer()),
        Some(1000)
    );
}

#[test]
fn it_omits_runtime_only_keys_from_the_default_config() {
    let res = Config::serialize_default(cli::build());
    assert!(!res.contains("session-id ="));
    assert!(!res.contains("config-file ="));
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec!["chat", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::AgentURL), "http://localhost:8000");
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["chat", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}
