//! Broker client interface: connection factory, connection, session and
//! read-only queue browser. `InMemoryBroker` is the embedded implementation.

mod memory;
mod message;

pub use memory::InMemoryBroker;
pub use message::{DeliveryMode, Destination, Message, MessageBody, PropertyValue};

use serde::{Deserialize, Serialize};
use crate::error::BrokerError;

// ========================================
// QUEUE HANDLE
// ========================================

/// Handle to a broker queue. Two refs with the same name are the same queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueRef {
    name: String,
}

impl QueueRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for QueueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Acknowledgement mode of a session. Browsing never consumes, so only
/// automatic acknowledgement is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    Auto,
}

// ========================================
// CLIENT TRAITS
// ========================================

pub trait ConnectionFactory: Send + Sync {
    fn create_connection(&self) -> Result<Box<dyn Connection>, BrokerError>;
}

pub trait Connection: Send {
    fn create_session(&mut self, transacted: bool, ack_mode: AckMode) -> Result<Box<dyn Session>, BrokerError>;

    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<(), BrokerError>;
}

pub trait Session: Send {
    /// Resolves a queue by name without opening a cursor on it.
    fn create_queue(&mut self, name: &str) -> Result<QueueRef, BrokerError>;

    /// Opens a forward-only, non-destructive cursor over the queue's pending messages.
    fn create_browser(&mut self, queue: &QueueRef) -> Result<Box<dyn Browser>, BrokerError>;

    /// Releases the session and every browser created under it. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), BrokerError>;
}

pub trait Browser: Send {
    fn queue(&self) -> &QueueRef;

    /// Next pending message, `None` once the cursor is exhausted.
    fn next_message(&mut self) -> Result<Option<Message>, BrokerError>;

    /// Releases the broker-side cursor early. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), BrokerError>;
}
