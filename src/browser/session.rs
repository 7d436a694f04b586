//! Browse Session: one connection + one non-transactional, auto-ack session,
//! scoped to a single request.
//!
//! Release is guaranteed: `close()` is explicit and idempotent, and `Drop`
//! closes whatever is still open, so an early `?` return never leaks a
//! broker-side cursor.

use tracing::{debug, warn};

use crate::broker::{AckMode, Browser, Connection, QueueRef, Session};
use crate::error::{BrokerError, BrowserError, Result};
use crate::naming::{Bound, NamingDirectory};

pub struct BrowseSession {
    connection: Option<Box<dyn Connection>>,
    session: Option<Box<dyn Session>>,
}

impl BrowseSession {
    /// Looks up the connection factory bound at `factory_name`, connects and
    /// opens a session.
    pub fn open(directory: &dyn NamingDirectory, factory_name: &str) -> Result<Self> {
        let factory = match directory.lookup(factory_name) {
            Ok(Bound::ConnectionFactory(factory)) => factory,
            Ok(other) => {
                return Err(BrowserError::Connection {
                    operation: "lookup connection factory",
                    reason: format!("'{}' is bound to a {}", factory_name, other.kind()),
                })
            }
            Err(e) => {
                return Err(BrowserError::Connection {
                    operation: "lookup connection factory",
                    reason: e.to_string(),
                })
            }
        };

        let mut connection = factory.create_connection().map_err(|e| BrowserError::Connection {
            operation: "create connection",
            reason: e.to_string(),
        })?;

        let session = match connection.create_session(false, AckMode::Auto) {
            Ok(session) => session,
            Err(e) => {
                if let Err(close_err) = connection.close() {
                    warn!(error = %close_err, "failed to close connection after session error");
                }
                return Err(BrowserError::Connection {
                    operation: "create session",
                    reason: e.to_string(),
                });
            }
        };

        debug!(factory = factory_name, "browse session opened");
        Ok(Self {
            connection: Some(connection),
            session: Some(session),
        })
    }

    pub fn resolve_queue(&mut self, name: &str) -> Result<QueueRef> {
        let session = self.session_mut().map_err(|source| BrowserError::Resolution {
            queue: name.to_string(),
            source,
        })?;
        session.create_queue(name).map_err(|source| BrowserError::Resolution {
            queue: name.to_string(),
            source,
        })
    }

    /// Opens a read-only cursor; it is released together with this session.
    pub fn browse(&mut self, queue: &QueueRef) -> Result<Box<dyn Browser>> {
        let session = self.session_mut().map_err(|source| BrowserError::Browse {
            queue: queue.name().to_string(),
            source,
        })?;
        session.create_browser(queue).map_err(|source| BrowserError::Browse {
            queue: queue.name().to_string(),
            source,
        })
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Closes the session (and with it every browser) then the connection.
    /// Both are attempted even if the first fails; the first failure is
    /// logged and returned. Closing an already closed session is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let mut first_err: Option<BrokerError> = None;

        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close() {
                warn!(error = %e, "failed to close broker session");
                first_err.get_or_insert(e);
            }
        }
        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.close() {
                warn!(error = %e, "failed to close broker connection");
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(BrowserError::Close(e)),
            None => Ok(()),
        }
    }

    fn session_mut(&mut self) -> std::result::Result<&mut Box<dyn Session>, BrokerError> {
        self.session.as_mut().ok_or(BrokerError::Closed { what: "browse session" })
    }
}

impl Drop for BrowseSession {
    fn drop(&mut self) {
        if self.session.is_some() || self.connection.is_some() {
            debug!("browse session released on drop");
            // close() already logged the failure
            let _ = self.close();
        }
    }
}
