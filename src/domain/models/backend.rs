#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    pub session_id: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryRecord>,
    pub session_id: String,
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the agent service is reachable before the
    /// user starts typing.
    async fn health_check(&self) -> Result<()>;

    /// Sends one message and waits for the reply. The `session_id` in the
    /// response always takes precedence over the one sent; a request without
    /// a session id starts a new conversation on the server.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Fetches the full ordered history for a session by its wire id.
    async fn history(&self, session_id: &str) -> Result<HistoryResponse>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
