//! Naming directory interface. Paths are `/`-separated; empty segments are
//! ignored, so `""`, `"/"` and `"//"` all name the root context.

mod memory;

pub use memory::InMemoryDirectory;

use std::fmt;
use std::sync::Arc;

use crate::broker::{ConnectionFactory, QueueRef};
use crate::error::NamingError;

/// What is bound at a path.
#[derive(Clone)]
pub enum Bound {
    /// A sub-directory; supports listing.
    Context,
    Queue(QueueRef),
    Topic(String),
    ConnectionFactory(Arc<dyn ConnectionFactory>),
    Other(String),
}

impl Bound {
    pub fn kind(&self) -> &'static str {
        match self {
            Bound::Context => "context",
            Bound::Queue(_) => "queue",
            Bound::Topic(_) => "topic",
            Bound::ConnectionFactory(_) => "connection factory",
            Bound::Other(_) => "other",
        }
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Context => f.write_str("Context"),
            Bound::Queue(queue) => f.debug_tuple("Queue").field(queue).finish(),
            Bound::Topic(name) => f.debug_tuple("Topic").field(name).finish(),
            Bound::ConnectionFactory(_) => f.write_str("ConnectionFactory"),
            Bound::Other(desc) => f.debug_tuple("Other").field(desc).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub bound: Bound,
}

pub trait NamingDirectory: Send + Sync {
    fn lookup(&self, path: &str) -> Result<Bound, NamingError>;

    /// Immediate bindings of the context at `path`, in the directory's own order.
    fn list_bindings(&self, path: &str) -> Result<Vec<Binding>, NamingError>;
}

pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
