use std::fmt;
use bytes::Bytes;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::broker::QueueRef;
use crate::utils::utils_time::current_time_ms;

// ---------- Destination ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Queue(QueueRef),
    Topic(String),
}

impl Destination {
    pub fn queue(name: impl Into<String>) -> Self {
        Destination::Queue(QueueRef::new(name))
    }

    pub fn topic(name: impl Into<String>) -> Self {
        Destination::Topic(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Destination::Queue(queue) => queue.name(),
            Destination::Topic(name) => name,
        }
    }
}

// ---------- Typed values ----------

/// Value of a message property or of a map-body entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Double(v) => write!(f, "{}", v),
            PropertyValue::String(v) => f.write_str(v),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    NonPersistent,
    Persistent,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::NonPersistent => f.write_str("NON_PERSISTENT"),
            DeliveryMode::Persistent => f.write_str("PERSISTENT"),
        }
    }
}

// ---------- Body ----------

/// Wire encoding of a message body.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Bytes(Bytes),
    Map(LinkedHashMap<String, PropertyValue>),
    Object(serde_json::Value),
    Stream(Vec<PropertyValue>),
    Text(String),
    /// An encoding this client does not model; `kind` is the broker's own label.
    Other { kind: String },
}

impl MessageBody {
    pub fn text(text: impl Into<String>) -> Self {
        MessageBody::Text(text.into())
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        MessageBody::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ---------- Message ----------

/// A message as handed out by a browser. Header fields are `None` when the
/// producer never set them.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub destination: Destination,
    pub timestamp: u64,
    pub correlation_id: Option<String>,
    pub delivery_mode: Option<DeliveryMode>,
    pub expiration: Option<u64>,
    pub priority: Option<u8>,
    pub redelivered: Option<bool>,
    pub reply_to: Option<Destination>,
    pub message_type: Option<String>,
    pub properties: LinkedHashMap<String, PropertyValue>,
    pub body: MessageBody,
}

impl Message {
    pub fn new(destination: Destination, body: MessageBody) -> Self {
        Self {
            id: format!("ID:{}", Uuid::new_v4()),
            destination,
            timestamp: current_time_ms(),
            correlation_id: None,
            delivery_mode: None,
            expiration: None,
            priority: None,
            redelivered: None,
            reply_to: None,
            message_type: None,
            properties: LinkedHashMap::new(),
            body,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.delivery_mode = Some(mode);
        self
    }

    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_redelivered(mut self, redelivered: bool) -> Self {
        self.redelivered = Some(redelivered);
        self
    }

    pub fn with_reply_to(mut self, reply_to: Destination) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
