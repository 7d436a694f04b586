#![allow(dead_code)]

use std::sync::Arc;
use queue_browser::broker::{Destination, InMemoryBroker, Message, MessageBody, QueueRef};
use queue_browser::config::NamingConfig;
use queue_browser::naming::{Bound, InMemoryDirectory};
use queue_browser::QueueBrowserEngine;

pub const FACTORY: &str = "ConnectionFactory";

pub struct TestBroker {
    pub broker: InMemoryBroker,
    pub directory: Arc<InMemoryDirectory>,
}

/// Broker + directory with the connection factory bound and nothing else.
pub fn setup_broker() -> TestBroker {
    let broker = InMemoryBroker::new();
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .bind(FACTORY, Bound::ConnectionFactory(Arc::new(broker.clone())))
        .unwrap();
    TestBroker { broker, directory }
}

impl TestBroker {
    pub fn bind_queue(&self, path: &str, name: &str) {
        self.broker.declare_queue(name);
        self.directory.bind(path, Bound::Queue(QueueRef::new(name))).unwrap();
    }

    pub fn send(&self, message: Message) {
        self.broker.enqueue(message).unwrap();
    }

    pub fn engine(&self) -> QueueBrowserEngine {
        QueueBrowserEngine::new(self.directory.clone(), NamingConfig::default())
    }

    /// Nothing left open broker-side.
    pub fn assert_released(&self) {
        assert_eq!(self.broker.open_cursors(), 0, "cursors leaked");
        assert_eq!(self.broker.open_connections(), 0, "connections leaked");
    }
}

pub fn text_message(queue: &str, id: &str, text: &str) -> Message {
    Message::new(Destination::queue(queue), MessageBody::text(text)).with_id(id)
}
