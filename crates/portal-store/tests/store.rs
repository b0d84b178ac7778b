#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use portal_model::{Role, Session};
use portal_store::{
    FileBackend, ManualClock, MemoryBackend, SessionStore, Store, SystemClock, TOKEN_EXPIRE_KEY,
    TokenState,
};
use proptest::prelude::*;
use serde_json::json;

fn session_store(clock: Arc<ManualClock>) -> SessionStore {
    SessionStore::new(Store::new(Arc::new(MemoryBackend::new()), clock))
}

fn sample_session() -> Session {
    Session {
        user_id: "admin".to_string(),
        role: Role::Admin,
        token: "abc".to_string(),
        permissions: vec!["audit".to_string()],
    }
}

#[test]
fn test_session_round_trip() {
    let sessions = session_store(Arc::new(ManualClock::new(0)));
    assert!(!sessions.is_logged_in());

    sessions.save_session(&sample_session(), Some(Duration::from_secs(60)));
    assert!(sessions.is_logged_in());
    assert_eq!(sessions.load_session(), Some(sample_session()));

    sessions.clear_user();
    assert!(!sessions.is_logged_in());
    assert!(sessions.store().keys().is_empty());
}

#[test]
fn test_expired_token_destroys_session() {
    let clock = Arc::new(ManualClock::new(0));
    let sessions = session_store(clock.clone());
    sessions.save_session(&sample_session(), Some(Duration::from_secs(2 * 60 * 60)));
    assert_eq!(sessions.token_state(), TokenState::Valid("abc".to_string()));

    clock.advance(Duration::from_secs(2 * 60 * 60 + 1));
    assert_eq!(sessions.auth_token(), None);
    assert!(!sessions.store().contains(TOKEN_EXPIRE_KEY));
    assert!(sessions.store().keys().is_empty());
    assert!(!sessions.is_logged_in());
    assert_eq!(sessions.load_session(), None);
    assert_eq!(sessions.token_state(), TokenState::Absent);
}

#[test]
fn test_zero_ttl_writes_no_expiring_entry() {
    let sessions = session_store(Arc::new(ManualClock::new(0)));
    sessions.set_auth_token("abc", Some(Duration::ZERO));
    assert!(!sessions.store().contains(TOKEN_EXPIRE_KEY));
    assert_eq!(sessions.auth_token().as_deref(), Some("abc"));

    sessions.clear_auth_token();
    assert_eq!(sessions.auth_token(), None);
}

#[test]
fn test_file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = Store::new(Arc::new(FileBackend::new(&path)), Arc::new(SystemClock));
    store.set("role", &Role::Reviewer, None);
    store.set("token_exp", "t", Some(Duration::from_secs(3600)));

    let reopened = Store::new(Arc::new(FileBackend::new(&path)), Arc::new(SystemClock));
    assert_eq!(reopened.get("role", Role::User), Role::Reviewer);
    assert_eq!(reopened.get("token_exp", String::new()), "t");

    let items = reopened.all_items();
    assert_eq!(items["role"], json!("reviewer"));
    assert!(items["token_exp"]["expireAt"].is_i64());
}

#[test]
fn test_unreadable_store_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{broken").unwrap();

    let sessions = SessionStore::new(Store::new(
        Arc::new(FileBackend::new(&path)),
        Arc::new(SystemClock),
    ));
    assert_eq!(sessions.user_id(), None);
    assert!(sessions.permissions().is_empty());
    assert!(sessions.store().keys().is_empty());
}

proptest! {
    #[test]
    fn prop_plain_values_round_trip(key in "[a-z_]{1,12}", value in ".*") {
        let store = Store::in_memory();
        store.set(&key, value.as_str(), None);
        prop_assert_eq!(store.get(&key, String::new()), value);
    }

    #[test]
    fn prop_entries_live_exactly_until_deadline(ttl_ms in 1_u64..100_000, elapsed in 0_u64..200_000) {
        let clock = Arc::new(ManualClock::new(10_000));
        let store = Store::new(Arc::new(MemoryBackend::new()), clock.clone());
        store.set("k", &1_u32, Some(Duration::from_millis(ttl_ms)));
        clock.advance(Duration::from_millis(elapsed));
        let expected = if elapsed > ttl_ms { 0 } else { 1 };
        prop_assert_eq!(store.get("k", 0_u32), expected);
    }
}
