//! Namespace Scanner: depth-first walk of the naming directory collecting queues.
//!
//! Each path is looked up on its own; contexts are listed and recursed into as
//! `parent + "/" + child`, queues are collected in visit order (pre-order, the
//! directory's own binding order), anything else is skipped.
//!
//! The directory is assumed to be a tree. `max_depth` bounds the walk in case
//! it is not: a link cycle produces ever longer paths, never a repeated one.

use tracing::{debug, trace};

use crate::broker::QueueRef;
use crate::error::{BrowserError, Result};
use crate::naming::{Bound, NamingDirectory};

pub const DEFAULT_MAX_DEPTH: usize = 32;

pub struct NamespaceScanner<'a> {
    directory: &'a dyn NamingDirectory,
    max_depth: usize,
}

impl<'a> NamespaceScanner<'a> {
    pub fn new(directory: &'a dyn NamingDirectory) -> Self {
        Self {
            directory,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Queues reachable from `root` (`""` is the namespace root). Any lookup
    /// or listing failure aborts the scan; no partial result is returned.
    pub fn scan(&self, root: &str) -> Result<Vec<QueueRef>> {
        let mut queues = Vec::new();
        self.visit(root, 0, &mut queues)?;
        debug!(root, found = queues.len(), "namespace scan complete");
        Ok(queues)
    }

    fn visit(&self, path: &str, depth: usize, out: &mut Vec<QueueRef>) -> Result<()> {
        if depth > self.max_depth {
            return Err(BrowserError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let bound = self.directory.lookup(path).map_err(|source| BrowserError::Discovery {
            path: path.to_string(),
            source,
        })?;

        match bound {
            Bound::Context => {
                let bindings = self.directory.list_bindings(path).map_err(|source| BrowserError::Discovery {
                    path: path.to_string(),
                    source,
                })?;
                for binding in bindings {
                    let child = format!("{}/{}", path, binding.name);
                    self.visit(&child, depth + 1, out)?;
                }
            }
            Bound::Queue(queue) => {
                trace!(path, queue = %queue, "queue found");
                out.push(queue);
            }
            other => trace!(path, kind = other.kind(), "skipping non-queue entry"),
        }
        Ok(())
    }
}
