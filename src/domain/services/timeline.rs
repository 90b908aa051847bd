#[cfg(test)]
#[path = "timeline_test.rs"]
mod tests;

use super::HistorySync;
use super::TimelineCache;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;
use crate::domain::models::CompletionRequest;
use crate::domain::models::CompletionResponse;
use crate::domain::models::Message;
use crate::domain::models::SessionId;

/// Everything the rendering layer needs to draw one conversation view. Owned
/// exclusively by [`SessionTimeline`]; readers never mutate it.
#[derive(Default)]
pub struct SessionState {
    pub session: Option<SessionId>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The conversation orchestrator. Holds the authoritative in-memory message
/// timeline for the active session, mirrors it into [`TimelineCache`], pulls
/// missing history through [`HistorySync`], and swaps the active identifier
/// when the server assigns a new one mid-conversation.
///
/// Sends are serialized by the `is_loading` guard: a second send while one is
/// in flight is ignored, not queued, so the optimistic user message and its
/// reply can never interleave with another exchange.
pub struct SessionTimeline {
    backend: BackendBox,
    cache: TimelineCache,
    state: SessionState,
}

impl SessionTimeline {
    pub fn new(backend: BackendBox, cache: TimelineCache) -> SessionTimeline {
        return SessionTimeline {
            backend,
            cache,
            state: SessionState::default(),
        };
    }

    pub fn state(&self) -> &SessionState {
        return &self.state;
    }

    pub fn messages(&self) -> &[Message] {
        return &self.state.messages;
    }

    /// Binds the timeline to a session identifier (or none for a fresh
    /// conversation) and populates it. A cached timeline wins outright; the
    /// remote history service is only consulted on a cache miss. A failed
    /// history fetch leaves the timeline empty with the error surfaced
    /// rather than guessing at content.
    pub async fn hydrate(&mut self, display_id: Option<&str>) {
        let session = display_id.map(SessionId::new);
        self.state = SessionState {
            session: session.clone(),
            messages: vec![],
            is_loading: true,
            error: None,
        };

        if let Some(cached) = self.cache.read(session.as_ref()).await {
            self.state.messages = cached;
        } else if let Some(id) = session.as_ref() {
            match HistorySync::fetch(&self.backend, &self.cache, id).await {
                Ok(messages) => {
                    self.state.messages = messages;
                }
                Err(err) => {
                    tracing::error!(session_id = id.wire(), error = %err, "Failed to hydrate from history");
                    self.state.error =
                        Some("Unable to load this conversation's history.".to_string());
                }
            }
        }

        self.state.is_loading = false;
    }

    /// Appends the user's message optimistically, sends it to the agent
    /// service, and appends the reply. When the response names a different
    /// session than the one the message was sent under, the full timeline is
    /// persisted under the new key strictly before the identifier swap, so a
    /// rehydration triggered by the swap finds it already cached.
    ///
    /// A message that trims to nothing, or a send while one is already in
    /// flight, is a no-op. On failure the optimistic message stays put; the
    /// user resends manually.
    pub async fn send_message(&mut self, text: &str) {
        let content = text.trim();
        if content.is_empty() || self.state.is_loading {
            return;
        }

        self.state.error = None;
        self.state.messages.push(Message::user(content));
        self.state.is_loading = true;

        let bound = self.state.session.clone();
        self.cache.write(bound.as_ref(), &self.state.messages).await;

        let mut request = CompletionRequest {
            message: content.to_string(),
            agent_id: None,
            session_id: bound.as_ref().map(|id| return id.wire().to_string()),
        };

        let agent_id = Config::get(ConfigKey::AgentID);
        if !agent_id.is_empty() {
            request.agent_id = Some(agent_id);
        }

        match self.backend.complete(request).await {
            Ok(res) => {
                self.apply_completion(bound, res).await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Completion request failed");
                self.state.error = Some(
                    "Unable to reach the agent service. Your message was kept; try sending it again."
                        .to_string(),
                );
                self.state.is_loading = false;
            }
        }
    }

    /// A reply for a session this timeline is no longer bound to is stale
    /// and dropped without touching the messages, but the loading flag is
    /// still released so later sends are not wedged.
    async fn apply_completion(&mut self, bound: Option<SessionId>, res: CompletionResponse) {
        if self.state.session != bound {
            tracing::debug!(session_id = res.session_id, "Dropping stale completion");
            self.state.is_loading = false;
            return;
        }

        self.state
            .messages
            .push(Message::assistant(&res.message, res.agent_name));

        let returned = SessionId::new(&res.session_id);
        if bound.as_ref() != Some(&returned) {
            self.migrate(returned).await;
        } else {
            self.cache.write(bound.as_ref(), &self.state.messages).await;
        }

        self.state.is_loading = false;
    }

    /// The cache write under the new key happens before the identifier swap.
    /// The old key's entry, the unsaved sentinel included, is removed so it
    /// cannot bleed into the next conversation started without an id.
    async fn migrate(&mut self, session: SessionId) {
        self.cache.write(Some(&session), &self.state.messages).await;

        let abandoned = self.state.session.take();
        self.cache.clear(abandoned.as_ref()).await;

        tracing::info!(session_id = session.wire(), "Adopted server-assigned session");
        self.state.session = Some(session);
    }

    /// Resets to an identifier-less conversation: empty timeline, error
    /// cleared, and the abandoned key's cache entry removed.
    pub async fn clear_messages(&mut self) {
        self.cache.clear(self.state.session.as_ref()).await;
        self.state = SessionState::default();
    }
}
