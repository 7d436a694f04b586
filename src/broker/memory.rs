//! In-memory broker: named FIFO queues plus connection/session/browser plumbing.
//! Browsing never dequeues; each browser walks a copy of the queue taken when it
//! was opened.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::broker::{
    AckMode, Browser, Connection, ConnectionFactory, Destination, Message, QueueRef, Session,
};
use crate::error::BrokerError;

// ---------- Queue ----------

struct MemoryQueue {
    messages: Mutex<VecDeque<Message>>,
}

impl MemoryQueue {
    fn new() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
        }
    }

    fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().iter().cloned().collect()
    }
}

// ---------- Broker ----------

struct BrokerState {
    // One entry per queue; each queue keeps its own FIFO lock.
    queues: DashMap<String, Arc<MemoryQueue>>,
    // Broker-side cursors: cursor id -> queue name
    cursors: DashMap<u64, String>,
    next_cursor: AtomicU64,
    open_connections: AtomicUsize,
    available: AtomicBool,
    sessions_enabled: AtomicBool,
    browsing_enabled: AtomicBool,
    close_failing: AtomicBool,
}

/// Cheap to clone; all clones share the same queues.
#[derive(Clone)]
pub struct InMemoryBroker {
    state: Arc<BrokerState>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(BrokerState {
                queues: DashMap::new(),
                cursors: DashMap::new(),
                next_cursor: AtomicU64::new(1),
                open_connections: AtomicUsize::new(0),
                available: AtomicBool::new(true),
                sessions_enabled: AtomicBool::new(true),
                browsing_enabled: AtomicBool::new(true),
                close_failing: AtomicBool::new(false),
            }),
        }
    }

    /// Returns true if the queue did not exist yet.
    pub fn declare_queue(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.state.queues.contains_key(&name) {
            return false;
        }
        self.state.queues.entry(name.clone()).or_insert_with(|| {
            debug!(queue = %name, "queue declared");
            Arc::new(MemoryQueue::new())
        });
        true
    }

    /// Appends a message to the queue named by its destination.
    pub fn enqueue(&self, message: Message) -> Result<(), BrokerError> {
        let name = match &message.destination {
            Destination::Queue(queue) => queue.name().to_string(),
            Destination::Topic(topic) => {
                return Err(BrokerError::Refused {
                    operation: "enqueue",
                    reason: format!("'{}' is a topic", topic),
                })
            }
        };
        let queue = self
            .state
            .queues
            .get(&name)
            .map(|q| q.value().clone())
            .ok_or(BrokerError::UnknownQueue { name })?;
        queue.messages.lock().push_back(message);
        Ok(())
    }

    pub fn depth(&self, name: &str) -> Option<usize> {
        self.state.queues.get(name).map(|q| q.messages.lock().len())
    }

    /// Cursors currently allocated broker-side.
    pub fn open_cursors(&self) -> usize {
        self.state.cursors.len()
    }

    pub fn open_connections(&self) -> usize {
        self.state.open_connections.load(Ordering::SeqCst)
    }

    /// While unavailable, every connection attempt is refused.
    pub fn set_available(&self, available: bool) {
        self.state.available.store(available, Ordering::SeqCst);
    }

    /// While disabled, connections refuse to create sessions.
    pub fn set_sessions_enabled(&self, enabled: bool) {
        self.state.sessions_enabled.store(enabled, Ordering::SeqCst);
    }

    /// While disabled, sessions refuse to open browsers.
    pub fn set_browsing_enabled(&self, enabled: bool) {
        self.state.browsing_enabled.store(enabled, Ordering::SeqCst);
    }

    /// While set, closing a session or connection still releases it but
    /// reports an error.
    pub fn set_close_failing(&self, failing: bool) {
        self.state.close_failing.store(failing, Ordering::SeqCst);
    }
}

impl BrokerState {
    fn close_result(&self, operation: &'static str) -> Result<(), BrokerError> {
        if self.close_failing.load(Ordering::SeqCst) {
            return Err(BrokerError::Refused {
                operation,
                reason: "broker did not acknowledge close".to_string(),
            });
        }
        Ok(())
    }
}

impl ConnectionFactory for InMemoryBroker {
    fn create_connection(&self) -> Result<Box<dyn Connection>, BrokerError> {
        if !self.state.available.load(Ordering::SeqCst) {
            return Err(BrokerError::Refused {
                operation: "create connection",
                reason: "broker unavailable".to_string(),
            });
        }
        self.state.open_connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            state: Arc::clone(&self.state),
            closed: false,
        }))
    }
}

// ---------- Connection ----------

struct MemoryConnection {
    state: Arc<BrokerState>,
    closed: bool,
}

impl Connection for MemoryConnection {
    fn create_session(&mut self, transacted: bool, _ack_mode: AckMode) -> Result<Box<dyn Session>, BrokerError> {
        if self.closed {
            return Err(BrokerError::Closed { what: "connection" });
        }
        if transacted {
            return Err(BrokerError::Refused {
                operation: "create session",
                reason: "transacted sessions are not supported".to_string(),
            });
        }
        if !self.state.sessions_enabled.load(Ordering::SeqCst) {
            return Err(BrokerError::Refused {
                operation: "create session",
                reason: "session limit reached".to_string(),
            });
        }
        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
            cursors: Vec::new(),
            closed: false,
        }))
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.state.open_connections.fetch_sub(1, Ordering::SeqCst);
        self.state.close_result("close connection")
    }
}

// ---------- Session ----------

struct MemorySession {
    state: Arc<BrokerState>,
    cursors: Vec<u64>,
    closed: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> Result<(), BrokerError> {
        if self.closed {
            return Err(BrokerError::Closed { what: "session" });
        }
        Ok(())
    }
}

impl Session for MemorySession {
    fn create_queue(&mut self, name: &str) -> Result<QueueRef, BrokerError> {
        self.ensure_open()?;
        if !self.state.queues.contains_key(name) {
            return Err(BrokerError::UnknownQueue { name: name.to_string() });
        }
        Ok(QueueRef::new(name))
    }

    fn create_browser(&mut self, queue: &QueueRef) -> Result<Box<dyn Browser>, BrokerError> {
        self.ensure_open()?;
        if !self.state.browsing_enabled.load(Ordering::SeqCst) {
            return Err(BrokerError::Refused {
                operation: "create browser",
                reason: "browsing is disabled".to_string(),
            });
        }
        let snapshot = self
            .state
            .queues
            .get(queue.name())
            .map(|q| q.snapshot())
            .ok_or_else(|| BrokerError::UnknownQueue { name: queue.name().to_string() })?;

        let cursor = self.state.next_cursor.fetch_add(1, Ordering::SeqCst);
        self.state.cursors.insert(cursor, queue.name().to_string());
        self.cursors.push(cursor);

        Ok(Box::new(MemoryBrowser {
            state: Arc::clone(&self.state),
            cursor,
            queue: queue.clone(),
            pending: snapshot.into_iter(),
        }))
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        if self.closed {
            return Ok(());
        }
        for cursor in self.cursors.drain(..) {
            self.state.cursors.remove(&cursor);
        }
        self.closed = true;
        self.state.close_result("close session")
    }
}

// ---------- Browser ----------

struct MemoryBrowser {
    state: Arc<BrokerState>,
    cursor: u64,
    queue: QueueRef,
    pending: std::vec::IntoIter<Message>,
}

impl Browser for MemoryBrowser {
    fn queue(&self) -> &QueueRef {
        &self.queue
    }

    fn next_message(&mut self) -> Result<Option<Message>, BrokerError> {
        if !self.state.cursors.contains_key(&self.cursor) {
            return Err(BrokerError::Closed { what: "browser" });
        }
        Ok(self.pending.next())
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        self.state.cursors.remove(&self.cursor);
        Ok(())
    }
}
