use anyhow::Result;
use test_utils::temp_cache_dir;
use tokio::fs;

use super::TimelineCache;
use crate::domain::models::Message;
use crate::domain::models::SessionId;

fn fixture_messages() -> Vec<Message> {
    return vec![
        Message::user("Hello!"),
        Message::assistant("Hi there", Some("AI Agent".to_string())),
    ];
}

#[test]
fn it_derives_storage_keys() {
    let session = SessionId::new("abc");
    assert_eq!(
        TimelineCache::storage_key(Some(&session)),
        "thread_abc".to_string()
    );
    assert_eq!(TimelineCache::storage_key(None), "new".to_string());
}

#[tokio::test]
async fn it_round_trips_timelines() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    let session = SessionId::new("abc");
    let messages = fixture_messages();

    cache.write(Some(&session), &messages).await;
    let read_back = cache.read(Some(&session)).await;

    assert_eq!(read_back, Some(messages));

    fs::remove_dir_all(&cache.cache_dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_skips_writing_empty_timelines() {
    let cache = TimelineCache::new(temp_cache_dir());
    let session = SessionId::new("abc");

    cache.write(Some(&session), &[]).await;

    assert!(!cache.cache_dir.exists());
    assert_eq!(cache.read(Some(&session)).await, None);
}

#[tokio::test]
async fn it_reads_absent_entries_as_none() {
    let cache = TimelineCache::new(temp_cache_dir());
    assert_eq!(cache.read(None).await, None);
}

#[tokio::test]
async fn it_uses_the_unsaved_key_without_a_session() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    let messages = fixture_messages();

    cache.write(None, &messages).await;

    assert!(cache.cache_dir.join("new.yaml").exists());
    assert_eq!(cache.read(None).await, Some(messages));

    fs::remove_dir_all(&cache.cache_dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_clears_entries() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    let session = SessionId::new("abc");

    cache.write(Some(&session), &fixture_messages()).await;
    cache.clear(Some(&session)).await;

    assert_eq!(cache.read(Some(&session)).await, None);

    fs::remove_dir_all(&cache.cache_dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_clears_absent_entries_quietly() {
    let cache = TimelineCache::new(temp_cache_dir());
    cache.clear(None).await;
    assert!(!cache.cache_dir.exists());
}

#[tokio::test]
async fn it_lists_summaries() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    cache
        .write(Some(&SessionId::new("abc")), &fixture_messages())
        .await;
    cache.write(None, &fixture_messages()).await;

    let listed = cache.list().await?;
    assert_eq!(listed.len(), 2);
    for cached in listed {
        assert_eq!(cached.messages.len(), 1);
        assert_eq!(cached.messages[0].content, "Hello!".to_string());
    }

    fs::remove_dir_all(&cache.cache_dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_skips_listing_entries_with_invalid_saved_at_stamps() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    cache
        .write(Some(&SessionId::new("abc")), &fixture_messages())
        .await;

    let corrupt = r#"
key: thread_corrupt
version: 0.1.0
saved_at: not-a-timestamp
messages:
- id: aaaa1111
  role: user
  content: Hello!
  timestamp: 2024-01-01T00:00:00-00:00
"#;
    fs::write(cache.cache_dir.join("thread_corrupt.yaml"), corrupt).await?;

    let listed = cache.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, "thread_abc".to_string());

    fs::remove_dir_all(&cache.cache_dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_deletes_all_entries() -> Result<()> {
    let cache = TimelineCache::new(temp_cache_dir());
    cache
        .write(Some(&SessionId::new("abc")), &fixture_messages())
        .await;

    cache.delete_all().await?;
    assert!(!cache.cache_dir.exists());

    return Ok(());
}

#[tokio::test]
async fn it_fails_deleting_unknown_entries() {
    let cache = TimelineCache::new(temp_cache_dir());
    let res = cache.delete("thread_missing").await;
    assert!(res.is_err());
}
