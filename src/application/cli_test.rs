use super::format_cached_timeline;
use crate::domain::models::CachedTimeline;
use crate::domain::models::Message;

fn fixture(content: &str) -> CachedTimeline {
    return CachedTimeline {
        key: "thread_abc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        saved_at: "2025-11-10T09:30:00-05:00".to_string(),
        messages: vec![Message::user(content)],
    };
}

#[test]
fn it_formats_short_summaries_untruncated() {
    let res = format_cached_timeline(&fixture("Hello!"));
    assert!(res.starts_with("- (Session: thread_abc)"));
    assert!(res.ends_with(", Hello!"));
}

#[test]
fn it_truncates_long_summaries() {
    let res = format_cached_timeline(&fixture(&"a".repeat(100)));
    assert!(res.ends_with(&format!("{}...", "a".repeat(67))));
}

#[test]
fn it_truncates_multibyte_summaries_on_char_boundaries() {
    // Two bytes per char, byte 67 lands mid-character.
    let res = format_cached_timeline(&fixture(&"é".repeat(40)));
    assert!(res.ends_with("..."));
    assert!(!res.contains('\u{FFFD}'));
}

#[test]
fn it_uses_the_first_line_only() {
    let res = format_cached_timeline(&fixture("first line\nsecond line"));
    assert!(res.ends_with(", first line"));
}
