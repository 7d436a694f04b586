use std::io::Write;
use std::sync::Arc;
use queue_browser::broker::InMemoryBroker;
use queue_browser::browser::BodyVariant;
use queue_browser::config::NamingConfig;
use queue_browser::fixture::{Fixture, FixtureError};
use queue_browser::naming::InMemoryDirectory;
use queue_browser::QueueBrowserEngine;

fn demo_fixture_path() -> String {
    format!("{}/demos/fixture.json", env!("CARGO_MANIFEST_DIR"))
}

fn install_demo() -> (InMemoryBroker, QueueBrowserEngine) {
    let broker = InMemoryBroker::new();
    let directory = InMemoryDirectory::new();
    Fixture::load(demo_fixture_path())
        .unwrap()
        .install(&broker, &directory)
        .unwrap();
    let engine = QueueBrowserEngine::new(Arc::new(directory), NamingConfig::default());
    (broker, engine)
}

#[test]
fn test_demo_fixture_discovers_queues_in_directory_order() {
    let (_broker, engine) = install_demo();
    let queues = engine.list_queues().unwrap();
    let names: Vec<&str> = queues.iter().map(|q| q.name()).collect();
    assert_eq!(names, vec!["orders", "invoices"]);
}

#[test]
fn test_demo_fixture_messages_are_browsable() {
    let (broker, engine) = install_demo();

    let ids: Vec<String> = engine
        .list_messages("orders")
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["ID:42", "ID:43", "ID:44"]);

    let bytes = engine.show_message("orders", "ID:44").unwrap();
    assert_eq!(bytes.body, BodyVariant::Bytes { length: 128 });

    let invoice = engine.show_message("invoices", "ID:100").unwrap();
    assert_eq!(invoice.headers.get("redelivered").map(String::as_str), Some("true"));
    assert!(matches!(invoice.body, BodyVariant::Object { .. }));

    assert_eq!(broker.open_cursors(), 0);
    assert_eq!(broker.open_connections(), 0);
}

#[test]
fn test_invalid_json_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ \"directory\": [ ").unwrap();

    let err = Fixture::load(file.path()).unwrap_err();
    assert!(matches!(err, FixtureError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match Fixture::load(&path).unwrap_err() {
        FixtureError::Io { path: reported, .. } => assert!(reported.ends_with("absent.json")),
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_minimal_fixture_binds_only_the_factory() {
    let broker = InMemoryBroker::new();
    let directory = InMemoryDirectory::new();
    Fixture::minimal("ConnectionFactory").install(&broker, &directory).unwrap();

    let engine = QueueBrowserEngine::new(Arc::new(directory), NamingConfig::default());
    assert!(engine.list_queues().unwrap().is_empty());
}

#[test]
fn test_huge_bytes_length_fails_instead_of_allocating() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "directory": [
                { "kind": "connection_factory", "path": "ConnectionFactory" },
                { "kind": "queue", "path": "jms/blobs", "name": "blobs" }
            ],
            "queues": { "blobs": [ { "body": { "type": "bytes", "length": 1000000000000 } } ] }
        }"#,
    )
    .unwrap();

    let broker = InMemoryBroker::new();
    let err = Fixture::load(file.path())
        .unwrap()
        .install(&broker, &InMemoryDirectory::new())
        .unwrap_err();
    assert!(matches!(err, FixtureError::BodyTooLarge { .. }));

    // a float length never reaches the allocator
    let err = Fixture::from_json(
        r#"{ "queues": { "blobs": [ { "body": { "type": "bytes", "length": 1e12 } } ] } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, FixtureError::Parse(_)));
}
