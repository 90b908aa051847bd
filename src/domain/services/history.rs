#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use anyhow::Context;
use anyhow::Result;

use super::TimelineCache;
use crate::domain::models::BackendBox;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SessionId;

/// Pulls the canonical history for a session from the agent service and
/// seeds the local cache with it. Only called on a cache miss; when a cached
/// timeline exists it wins and the remote history is not consulted.
pub struct HistorySync {}

impl HistorySync {
    pub async fn fetch(
        backend: &BackendBox,
        cache: &TimelineCache,
        session: &SessionId,
    ) -> Result<Vec<Message>> {
        let res = backend
            .history(session.wire())
            .await
            .context("History is unavailable")?;

        let messages = res
            .messages
            .into_iter()
            .filter_map(|record| {
                let Some(role) = Role::parse(&record.role) else {
                    tracing::warn!(
                        role = record.role,
                        session_id = session.wire(),
                        "Skipping history record with unknown role"
                    );
                    return None;
                };

                return Some(Message::from_history(
                    role,
                    &record.content,
                    record.timestamp,
                    record.agent_name,
                ));
            })
            .collect::<Vec<Message>>();

        cache.write(Some(session), &messages).await;

        return Ok(messages);
    }
}
