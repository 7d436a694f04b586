mod helpers;

use std::sync::Arc;
use queue_browser::broker::{InMemoryBroker, QueueRef};
use queue_browser::browser::BrowseSession;
use queue_browser::error::{BrokerError, BrowserError};
use queue_browser::naming::{Bound, InMemoryDirectory};
use helpers::{setup_broker, text_message, FACTORY};

mod open {
    use super::*;

    #[test]
    fn test_missing_factory_is_connection_error() {
        let directory = InMemoryDirectory::new();
        let err = BrowseSession::open(&directory, FACTORY).err().unwrap();
        assert!(matches!(
            err,
            BrowserError::Connection { operation: "lookup connection factory", .. }
        ));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_factory_name_bound_to_wrong_kind() {
        let directory = InMemoryDirectory::new();
        directory.bind(FACTORY, Bound::Queue(QueueRef::new("oops"))).unwrap();

        let err = BrowseSession::open(&directory, FACTORY).err().unwrap();
        assert_eq!(err.kind(), "connection");
        assert!(err.to_string().contains("queue"));
    }

    #[test]
    fn test_unavailable_broker_is_connection_error() {
        let tb = setup_broker();
        tb.broker.set_available(false);

        let err = BrowseSession::open(tb.directory.as_ref(), FACTORY).err().unwrap();
        assert!(matches!(err, BrowserError::Connection { operation: "create connection", .. }));
        tb.assert_released();
    }

    #[test]
    fn test_custom_factory_name() {
        let broker = InMemoryBroker::new();
        let directory = InMemoryDirectory::new();
        directory
            .bind("java:/jms/CF", Bound::ConnectionFactory(Arc::new(broker.clone())))
            .unwrap();

        let mut session = BrowseSession::open(&directory, "java:/jms/CF").unwrap();
        assert!(session.is_open());
        session.close().unwrap();
        assert_eq!(broker.open_connections(), 0);
    }
}

mod release {
    use super::*;

    #[test]
    fn test_close_is_idempotent() {
        let tb = setup_broker();
        let mut session = BrowseSession::open(tb.directory.as_ref(), FACTORY).unwrap();
        assert_eq!(tb.broker.open_connections(), 1);

        session.close().unwrap();
        session.close().unwrap();
        assert!(!session.is_open());
        tb.assert_released();
    }

    #[test]
    fn test_drop_releases_browsers() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        tb.send(text_message("orders", "ID:1", "x"));
        {
            let mut session = BrowseSession::open(tb.directory.as_ref(), FACTORY).unwrap();
            let queue = session.resolve_queue("orders").unwrap();
            let _a = session.browse(&queue).unwrap();
            let _b = session.browse(&queue).unwrap();
            assert_eq!(tb.broker.open_cursors(), 2);
        }
        tb.assert_released();
    }

    #[test]
    fn test_use_after_close_fails() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        let mut session = BrowseSession::open(tb.directory.as_ref(), FACTORY).unwrap();
        session.close().unwrap();

        match session.resolve_queue("orders") {
            Err(BrowserError::Resolution { queue, source }) => {
                assert_eq!(queue, "orders");
                assert!(matches!(source, BrokerError::Closed { .. }));
            }
            other => panic!("expected resolution error, got {:?}", other),
        }
        let err = session.browse(&QueueRef::new("orders")).err().unwrap();
        assert_eq!(err.kind(), "browse");
    }

    #[test]
    fn test_error_paths_release_everything() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        let engine = tb.engine();

        // unknown queue
        let err = engine.list_messages("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.kind(), "resolution");
        tb.assert_released();

        // browse refused
        tb.broker.set_browsing_enabled(false);
        let err = engine.list_messages("orders").unwrap_err();
        assert!(matches!(err, BrowserError::Browse { .. }));
        assert!(!err.is_not_found());
        tb.assert_released();

        // message missing
        tb.broker.set_browsing_enabled(true);
        let err = engine.show_message("orders", "ID:404").unwrap_err();
        assert_eq!(err.kind(), "not_found");
        tb.assert_released();
    }
}

mod close_failures {
    use super::*;

    #[test]
    fn test_failed_session_creation_closes_connection() {
        let tb = setup_broker();
        tb.broker.set_sessions_enabled(false);

        let err = BrowseSession::open(tb.directory.as_ref(), FACTORY).err().unwrap();
        assert!(matches!(err, BrowserError::Connection { operation: "create session", .. }));
        assert_eq!(tb.broker.open_connections(), 0);
    }

    #[test]
    fn test_close_failure_is_returned_once() {
        let tb = setup_broker();
        let mut session = BrowseSession::open(tb.directory.as_ref(), FACTORY).unwrap();
        tb.broker.set_close_failing(true);

        match session.close() {
            Err(BrowserError::Close(BrokerError::Refused { operation, .. })) => {
                assert_eq!(operation, "close session");
            }
            other => panic!("expected close error, got {:?}", other),
        }
        assert!(session.close().is_ok());
        tb.assert_released();
    }

    #[test]
    fn test_close_failure_after_successful_work_is_the_request_error() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        tb.send(text_message("orders", "ID:1", "x"));
        tb.broker.set_close_failing(true);

        let err = tb.engine().list_messages("orders").unwrap_err();
        assert!(matches!(err, BrowserError::Close(_)));
        assert_eq!(err.kind(), "close");

        let err = tb.engine().show_message("orders", "ID:1").unwrap_err();
        assert!(matches!(err, BrowserError::Close(_)));
        tb.assert_released();
    }

    #[test]
    fn test_work_error_wins_over_close_failure() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        tb.send(text_message("orders", "ID:1", "x"));
        tb.broker.set_close_failing(true);

        let err = tb.engine().show_message("orders", "ID:404").unwrap_err();
        assert!(matches!(err, BrowserError::NotFound { .. }));

        let err = tb.engine().list_messages("missing").unwrap_err();
        assert_eq!(err.kind(), "resolution");
        tb.assert_released();
    }
}

mod browsers {
    use super::*;

    #[test]
    fn test_browser_close_releases_cursor_before_session() {
        let tb = setup_broker();
        tb.bind_queue("orders", "orders");
        tb.send(text_message("orders", "ID:1", "x"));

        let mut session = BrowseSession::open(tb.directory.as_ref(), FACTORY).unwrap();
        let queue = session.resolve_queue("orders").unwrap();
        let mut browser = session.browse(&queue).unwrap();
        assert_eq!(tb.broker.open_cursors(), 1);

        browser.close().unwrap();
        browser.close().unwrap();
        assert_eq!(tb.broker.open_cursors(), 0);
        assert_eq!(
            browser.next_message().unwrap_err(),
            BrokerError::Closed { what: "browser" }
        );
        assert!(session.is_open());

        session.close().unwrap();
        tb.assert_released();
    }
}
