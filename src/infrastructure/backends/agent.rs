#[cfg(test)]
#[path = "agent_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::CompletionRequest;
use crate::domain::models::CompletionResponse;
use crate::domain::models::HistoryResponse;

/// HTTP client for the remote agent service.
pub struct AgentService {
    url: String,
    timeout: String,
}

impl Default for AgentService {
    fn default() -> AgentService {
        return AgentService {
            url: Config::get(ConfigKey::AgentURL),
            timeout: Config::get(ConfigKey::AgentHealthCheckTimeout),
        };
    }
}

#[async_trait]
impl Backend for AgentService {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let res = reqwest::Client::new()
            .get(format!("{url}/health", url = self.url))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "Agent service is not running");
            bail!("Agent service is not running");
        }

        let res = res.unwrap();
        if res.status() != 200 {
            tracing::error!(status = res.status().as_u16(), "Agent service health check failed");
            bail!("Agent service health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let res = reqwest::Client::new()
            .post(format!("{url}/chat", url = self.url))
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make completion request to the agent service"
            );
            bail!("Failed to make completion request to the agent service");
        }

        let completion = res.json::<CompletionResponse>().await?;
        tracing::debug!(body = ?completion, "Completion response");

        return Ok(completion);
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, session_id: &str) -> Result<HistoryResponse> {
        let res = reqwest::Client::new()
            .get(format!("{url}/chat/history/{session_id}", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                session_id = session_id,
                "Failed to fetch history from the agent service"
            );
            bail!("Failed to fetch history from the agent service");
        }

        let history = res.json::<HistoryResponse>().await?;
        tracing::debug!(
            session_id = session_id,
            messages = history.messages.len(),
            "History response"
        );

        return Ok(history);
    }
}
