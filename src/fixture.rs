//! JSON fixture seeding the embedded broker and naming directory.
//!
//! ```json
//! {
//!   "directory": [
//!     { "kind": "connection_factory", "path": "ConnectionFactory" },
//!     { "kind": "queue", "path": "jms/orders", "name": "orders" },
//!     { "kind": "topic", "path": "jms/news", "name": "news" }
//!   ],
//!   "queues": {
//!     "orders": [
//!       { "id": "ID:42", "properties": { "tenant": "acme" },
//!         "body": { "type": "text", "text": "hello" } }
//!     ]
//!   }
//! }
//! ```
//!
//! Every queue bound in the directory is declared on the broker, even when the
//! fixture holds no messages for it.

use std::path::Path;
use std::sync::Arc;
use bytes::Bytes;
use hashlink::LinkedHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::broker::{DeliveryMode, Destination, InMemoryBroker, Message, MessageBody, PropertyValue, QueueRef};
use crate::error::{BrokerError, NamingError};
use crate::naming::{Bound, InMemoryDirectory};

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("cannot read fixture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot bind fixture entry: {0}")]
    Naming(#[from] NamingError),

    #[error("cannot enqueue fixture message: {0}")]
    Broker(#[from] BrokerError),

    #[error("bytes body of {length} bytes exceeds the {max} byte limit")]
    BodyTooLarge { length: usize, max: usize },
}

/// Upper bound for a generated `bytes` body.
pub const MAX_BYTES_BODY: usize = 16 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub directory: Vec<BindingSpec>,
    #[serde(default)]
    pub queues: LinkedHashMap<String, Vec<MessageSpec>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingSpec {
    ConnectionFactory { path: String },
    Context { path: String },
    Queue { path: String, name: String },
    Topic { path: String, name: String },
    Other { path: String, description: String },
}

#[derive(Debug, Deserialize)]
pub struct MessageSpec {
    pub id: Option<String>,
    pub timestamp: Option<u64>,
    pub correlation_id: Option<String>,
    pub delivery_mode: Option<DeliveryMode>,
    pub expiration: Option<u64>,
    pub priority: Option<u8>,
    pub redelivered: Option<bool>,
    /// Queue name replies go to.
    pub reply_to: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub properties: LinkedHashMap<String, PropertyValue>,
    pub body: BodySpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodySpec {
    /// Either explicit `data` or `length` zero bytes.
    Bytes {
        #[serde(default)]
        data: Option<Vec<u8>>,
        #[serde(default)]
        length: Option<usize>,
    },
    Map { entries: LinkedHashMap<String, PropertyValue> },
    Object { value: serde_json::Value },
    Stream {
        #[serde(default)]
        items: Vec<PropertyValue>,
    },
    Text { text: String },
    Other { kind: String },
}

impl TryFrom<BodySpec> for MessageBody {
    type Error = FixtureError;

    fn try_from(spec: BodySpec) -> Result<Self, Self::Error> {
        Ok(match spec {
            BodySpec::Bytes { data: Some(data), .. } => MessageBody::Bytes(Bytes::from(data)),
            BodySpec::Bytes { data: None, length } => {
                let length = length.unwrap_or(0);
                if length > MAX_BYTES_BODY {
                    return Err(FixtureError::BodyTooLarge { length, max: MAX_BYTES_BODY });
                }
                MessageBody::Bytes(Bytes::from(vec![0u8; length]))
            }
            BodySpec::Map { entries } => MessageBody::Map(entries),
            BodySpec::Object { value } => MessageBody::Object(value),
            BodySpec::Stream { items } => MessageBody::Stream(items),
            BodySpec::Text { text } => MessageBody::Text(text),
            BodySpec::Other { kind } => MessageBody::Other { kind },
        })
    }
}

impl MessageSpec {
    fn into_message(self, queue: &str) -> Result<Message, FixtureError> {
        let mut message = Message::new(Destination::queue(queue), self.body.try_into()?);
        if let Some(id) = self.id {
            message.id = id;
        }
        if let Some(timestamp) = self.timestamp {
            message.timestamp = timestamp;
        }
        message.correlation_id = self.correlation_id;
        message.delivery_mode = self.delivery_mode;
        message.expiration = self.expiration;
        message.priority = self.priority;
        message.redelivered = self.redelivered;
        message.reply_to = self.reply_to.map(Destination::queue);
        message.message_type = self.message_type;
        message.properties = self.properties;
        Ok(message)
    }
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Only a connection factory bound under `factory_name`.
    pub fn minimal(factory_name: &str) -> Self {
        Self {
            directory: vec![BindingSpec::ConnectionFactory {
                path: factory_name.to_string(),
            }],
            queues: LinkedHashMap::new(),
        }
    }

    pub fn install(self, broker: &InMemoryBroker, directory: &InMemoryDirectory) -> Result<(), FixtureError> {
        let mut bound_queues = 0usize;
        for spec in self.directory {
            match spec {
                BindingSpec::ConnectionFactory { path } => {
                    directory.bind(&path, Bound::ConnectionFactory(Arc::new(broker.clone())))?
                }
                BindingSpec::Context { path } => directory.create_subcontext(&path)?,
                BindingSpec::Queue { path, name } => {
                    broker.declare_queue(name.clone());
                    directory.bind(&path, Bound::Queue(QueueRef::new(name)))?;
                    bound_queues += 1;
                }
                BindingSpec::Topic { path, name } => directory.bind(&path, Bound::Topic(name))?,
                BindingSpec::Other { path, description } => directory.bind(&path, Bound::Other(description))?,
            }
        }

        let mut messages = 0usize;
        for (queue, specs) in self.queues {
            broker.declare_queue(queue.clone());
            for spec in specs {
                broker.enqueue(spec.into_message(&queue)?)?;
                messages += 1;
            }
        }

        info!(bound_queues, messages, "fixture installed");
        Ok(())
    }
}
