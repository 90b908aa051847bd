#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::Local;
use chrono::SecondsFormat;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Role;

/// One turn in a conversation. Messages are created once and never mutated;
/// clearing the timeline or switching sessions is the only way they go away.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl Message {
    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn now() -> String {
        return Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    }

    pub fn user(content: &str) -> Message {
        return Message {
            id: Message::create_id(),
            role: Role::User,
            content: content.to_string(),
            timestamp: Message::now(),
            agent_name: None,
        };
    }

    pub fn assistant(content: &str, agent_name: Option<String>) -> Message {
        return Message {
            id: Message::create_id(),
            role: Role::Assistant,
            content: content.to_string(),
            timestamp: Message::now(),
            agent_name,
        };
    }

    /// Used when adopting records from the history service, where the role
    /// and timestamp come from the wire rather than this client.
    pub fn from_history(
        role: Role,
        content: &str,
        timestamp: Option<String>,
        agent_name: Option<String>,
    ) -> Message {
        return Message {
            id: Message::create_id(),
            role,
            content: content.to_string(),
            timestamp: timestamp.unwrap_or_else(Message::now),
            agent_name,
        };
    }
}
