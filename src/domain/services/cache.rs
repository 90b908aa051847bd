#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use chrono::SecondsFormat;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::CachedTimeline;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SessionId;

/// Storage key for conversations the server has not named yet.
const UNSAVED_KEY: &str = "new";

/// Durable mirror of conversation timelines, one YAML file per storage key.
/// The cache is best effort: reads and writes that fail are logged and
/// swallowed, and the in-memory timeline carries on without it. The remote
/// history service plus in-memory state remain the source of truth.
pub struct TimelineCache {
    pub cache_dir: path::PathBuf,
}

impl Default for TimelineCache {
    fn default() -> TimelineCache {
        let cache_dir = dirs::cache_dir().unwrap().join("matcha/timelines");

        return TimelineCache::new(cache_dir);
    }
}

impl TimelineCache {
    pub fn new(cache_dir: path::PathBuf) -> TimelineCache {
        return TimelineCache { cache_dir };
    }

    pub fn storage_key(session: Option<&SessionId>) -> String {
        return session
            .map(|id| return id.wire().to_string())
            .unwrap_or_else(|| return UNSAVED_KEY.to_string());
    }

    fn get_file_path(&self, key: &str) -> path::PathBuf {
        return self.cache_dir.join(format!("{key}.yaml"));
    }

    pub async fn read(&self, session: Option<&SessionId>) -> Option<Vec<Message>> {
        let key = TimelineCache::storage_key(session);
        match self.try_read(&key).await {
            Ok(messages) => return messages,
            Err(err) => {
                tracing::warn!(key = key, error = %err, "Failed to read cached timeline");
                return None;
            }
        }
    }

    pub async fn write(&self, session: Option<&SessionId>, messages: &[Message]) {
        // Never persist an empty conversation, it would mask a later
        // legitimate history fetch.
        if messages.is_empty() {
            return;
        }

        let key = TimelineCache::storage_key(session);
        if let Err(err) = self.try_write(&key, messages).await {
            tracing::warn!(key = key, error = %err, "Failed to write cached timeline");
        }
    }

    pub async fn clear(&self, session: Option<&SessionId>) {
        let key = TimelineCache::storage_key(session);
        if let Err(err) = self.try_clear(&key).await {
            tracing::warn!(key = key, error = %err, "Failed to clear cached timeline");
        }
    }

    async fn try_read(&self, key: &str) -> Result<Option<Vec<Message>>> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        let cached: CachedTimeline = serde_yaml::from_str(&payload)?;

        return Ok(Some(cached.messages));
    }

    async fn try_write(&self, key: &str, messages: &[Message]) -> Result<()> {
        let cached = CachedTimeline {
            key: key.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            messages: messages.to_vec(),
        };

        let payload = serde_yaml::to_string(&cached)?;

        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).await?;
        }

        let mut file = fs::File::create(self.get_file_path(key)).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    async fn try_clear(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    /// Returns cached timelines sorted by save time, trimmed down to the
    /// first user message so the sessions CLI can print summaries.
    pub async fn list(&self) -> Result<Vec<CachedTimeline>> {
        let mut entries = vec![];
        if !self.cache_dir.exists() {
            return Ok(vec![]);
        }

        let mut dir = fs::read_dir(&self.cache_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let payload = fs::read_to_string(file.path()).await?;
            let mut cached: CachedTimeline = serde_yaml::from_str(&payload)?;

            let Ok(saved_at) = DateTime::parse_from_rfc3339(&cached.saved_at) else {
                tracing::warn!(
                    file = ?file.path(),
                    saved_at = cached.saved_at,
                    "Skipping cached timeline with an invalid saved_at stamp"
                );
                continue;
            };

            cached.messages = cached
                .messages
                .iter()
                .filter(|msg| return msg.role == Role::User)
                .take(1)
                .cloned()
                .collect();

            entries.push((saved_at, cached));
        }

        entries.sort_by_key(|(saved_at, _)| return *saved_at);

        return Ok(entries
            .into_iter()
            .map(|(_, cached)| return cached)
            .collect());
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            bail!(format!("No cached timeline found for {key}"));
        }

        fs::remove_file(file_path).await?;
        return Ok(());
    }

    pub async fn delete_all(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&self.cache_dir).await?;
        return Ok(());
    }
}
