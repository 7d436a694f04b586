use hashlink::LinkedHashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub id: String,
    /// Epoch millis as set by the producer.
    pub timestamp: u64,
    pub queue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDetail {
    pub id: String,
    pub destination: String,
    /// Standard header fields; a field the producer never set has no key.
    pub headers: LinkedHashMap<String, String>,
    pub properties: LinkedHashMap<String, String>,
    pub body: BodyVariant,
}

/// Display form of a message body, one arm per wire encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyVariant {
    Bytes { length: usize },
    Map { entries: LinkedHashMap<String, String> },
    Object { text: String },
    Stream,
    Text { text: String },
    Unsupported { diagnostic: String },
}
