use neonchat_core::{FileStore, KeyValueStore, Message, Transcript, TranscriptStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample_transcript() -> Transcript {
    Transcript::from(vec![
        Message::incoming("Welcome!", "08:59"),
        Message::outgoing("multi\nline", "09:00"),
        Message::incoming("Ünïcödé 🙂", "09:01"),
    ])
}

#[test]
fn test_round_trip_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store = TranscriptStore::new(Box::new(FileStore::new(temp_dir.path()).unwrap()), "history");

    store.save(&sample_transcript());

    assert_eq!(store.load(), Some(sample_transcript()));
}

#[test]
fn test_clear_then_load_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    let store = TranscriptStore::new(Box::new(FileStore::new(temp_dir.path()).unwrap()), "history");

    store.save(&sample_transcript());
    store.clear();

    assert_eq!(store.load(), None);
    assert!(!temp_dir.path().join("history.json").exists());
}

#[test]
fn test_history_written_by_legacy_widget_loads() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FileStore::new(temp_dir.path()).unwrap();
    backend
        .set(
            "ceo-ai-chat-history",
            r#"[{"text":"hi","alignment":"right","time":"10:00 AM"},{"text":"Hello!","alignment":"left","time":"10:00 AM"}]"#,
        )
        .unwrap();

    let store = TranscriptStore::new(Box::new(backend), "ceo-ai-chat-history");
    let transcript = store.load().unwrap();

    assert_eq!(
        transcript,
        Transcript::from(vec![
            Message::outgoing("hi", "10:00 AM"),
            Message::incoming("Hello!", "10:00 AM"),
        ])
    );
}

#[test]
fn test_truncated_file_is_treated_as_absent() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("history.json"), r#"[{"text":"hi","align"#).unwrap();

    let store = TranscriptStore::new(Box::new(FileStore::new(temp_dir.path()).unwrap()), "history");

    assert_eq!(store.load(), None);
}
