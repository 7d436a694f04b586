pub mod broker;
pub mod browser;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fixture;
pub mod naming;
pub mod utils;

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::broker::QueueRef;
use crate::browser::{lookup, projector, BrowseSession, MessageDetail, MessageSummary, NamespaceScanner};
use crate::config::NamingConfig;
use crate::error::{BrowserError, Result};
use crate::naming::NamingDirectory;

// ========================================
// ENGINE
// ========================================

/// Entry point for the three read-only operations.
/// Cheap to clone; holds no per-request state. Every call is blocking and
/// opens (and releases) its own broker session.
#[derive(Clone)]
pub struct QueueBrowserEngine {
    pub directory: Arc<dyn NamingDirectory>,
    pub naming: NamingConfig,
    pub start_time: Instant,
}

impl QueueBrowserEngine {
    pub fn new(directory: Arc<dyn NamingDirectory>, naming: NamingConfig) -> Self {
        Self {
            directory,
            naming,
            start_time: Instant::now(),
        }
    }

    /// Queues registered in the directory under the configured scan root.
    pub fn list_queues(&self) -> Result<Vec<QueueRef>> {
        NamespaceScanner::new(self.directory.as_ref())
            .with_max_depth(self.naming.scan_max_depth)
            .scan(&self.naming.scan_root)
    }

    /// Pending messages of `queue`, in broker order.
    pub fn list_messages(&self, queue: &str) -> Result<Vec<MessageSummary>> {
        self.with_session(|session| {
            let queue = session.resolve_queue(queue)?;
            let mut browser = session.browse(&queue)?;
            let summaries = lookup::list_all(browser.as_mut()).collect::<Result<Vec<_>>>()?;
            browser.close().map_err(BrowserError::Close)?;
            debug!(queue = %queue, count = summaries.len(), "queue browsed");
            Ok(summaries)
        })
    }

    pub fn show_message(&self, queue: &str, message_id: &str) -> Result<MessageDetail> {
        self.with_session(|session| {
            let queue = session.resolve_queue(queue)?;
            let mut browser = session.browse(&queue)?;
            let message = lookup::find_by_id(browser.as_mut(), message_id)?;
            browser.close().map_err(BrowserError::Close)?;
            Ok(projector::project(&message))
        })
    }

    /// Runs `f` inside a fresh session. The session is closed on success and
    /// released by `Drop` when `f` fails, so the error from `f` wins over any
    /// close failure. A browser left open by a failing `f` goes with the session.
    fn with_session<T>(&self, f: impl FnOnce(&mut BrowseSession) -> Result<T>) -> Result<T> {
        let mut session = BrowseSession::open(self.directory.as_ref(), &self.naming.factory_name)?;
        let out = f(&mut session)?;
        session.close()?;
        Ok(out)
    }
}
