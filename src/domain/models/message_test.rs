use super::Message;
use super::Role;

#[test]
fn it_creates_user_messages() {
    let msg = Message::user("Hi there!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hi there!".to_string());
    assert_eq!(msg.agent_name, None);
    assert!(!msg.id.is_empty());
    assert!(!msg.timestamp.is_empty());
}

#[test]
fn it_creates_assistant_messages_with_agent_name() {
    let msg = Message::assistant("Hello!", Some("AI Agent".to_string()));
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.content, "Hello!".to_string());
    assert_eq!(msg.agent_name, Some("AI Agent".to_string()));
}

#[test]
fn it_creates_unique_ids() {
    let first = Message::user("one");
    let second = Message::user("two");
    assert_ne!(first.id, second.id);
}

#[test]
fn it_keeps_history_timestamps() {
    let msg = Message::from_history(
        Role::Assistant,
        "Yo",
        Some("2025-11-10T09:30:00-05:00".to_string()),
        None,
    );
    assert_eq!(msg.timestamp, "2025-11-10T09:30:00-05:00".to_string());
}

#[test]
fn it_defaults_missing_history_timestamps() {
    let msg = Message::from_history(Role::User, "Hi", None, None);
    assert!(!msg.timestamp.is_empty());
}

#[test]
fn it_serializes_roles_lowercase() {
    let msg = Message::user("Hi");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "user");
    assert!(json.get("agent_name").is_none());
}

#[test]
fn it_parses_roles() {
    assert_eq!(Role::parse("user"), Some(Role::User));
    assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
    assert_eq!(Role::parse("system"), Some(Role::System));
    assert_eq!(Role::parse("User"), None);
    assert_eq!(Role::parse("tool"), None);
}
