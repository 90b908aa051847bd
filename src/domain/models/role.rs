use serde_derive::Deserialize;
use serde_derive::Serialize;

/// The closed set of speakers in a conversation. Matches the agent service's
/// wire values, which are lowercase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "user" => return Some(Role::User),
            "assistant" => return Some(Role::Assistant),
            "system" => return Some(Role::System),
            _ => return None,
        }
    }
}
