use std::sync::Arc;

use occam_chat::session::{FileSessionStorage, SessionIdentity, SessionStorage, SESSION_KEY};
use uuid::Uuid;

#[test]
fn test_session_id_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("occam-chat").join("session.json");

    let first_run = SessionIdentity::new(Arc::new(FileSessionStorage::new(&path)));
    let id = first_run.get_or_create_session_id();
    assert!(Uuid::parse_str(&id).is_ok());

    let second_run = SessionIdentity::new(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(second_run.get_or_create_session_id(), id);

    let stored = FileSessionStorage::new(&path).get(SESSION_KEY).unwrap();
    assert_eq!(stored, Some(id));
}

#[test]
fn test_unusable_storage_path_degrades_silently() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the session file should be cannot be read as a file
    let identity = SessionIdentity::new(Arc::new(FileSessionStorage::new(dir.path())));

    let id = identity.get_or_create_session_id();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_eq!(identity.get_or_create_session_id(), id);
}

#[test]
fn test_corrupt_session_file_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"sessionId": "abc"#).unwrap();

    let first_run = SessionIdentity::new(Arc::new(FileSessionStorage::new(&path)));
    let id = first_run.get_or_create_session_id();
    assert!(Uuid::parse_str(&id).is_ok());

    let second_run = SessionIdentity::new(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(second_run.get_or_create_session_id(), id);
}
