use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

/// On-disk envelope for a cached conversation. `messages` must round-trip
/// exactly; everything else is bookkeeping for the sessions CLI.
#[derive(Serialize, Deserialize)]
pub struct CachedTimeline {
    pub key: String,
    pub version: String,
    pub saved_at: String,
    pub messages: Vec<Message>,
}
