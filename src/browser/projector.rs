//! Message Projector: turns a browsed message into a display record.
//!
//! Never reads bytes or stream bodies; a browsed message must come out of
//! inspection exactly as it went in.

use hashlink::LinkedHashMap;

use crate::broker::{Message, MessageBody};
use crate::browser::models::{BodyVariant, MessageDetail};

pub fn project(message: &Message) -> MessageDetail {
    MessageDetail {
        id: message.id.clone(),
        destination: message.destination.name().to_string(),
        headers: headers(message),
        properties: message
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect(),
        body: body(message),
    }
}

fn headers(message: &Message) -> LinkedHashMap<String, String> {
    let mut fields = LinkedHashMap::new();
    let mut field = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            fields.insert(name.to_string(), value);
        }
    };

    field("correlationId", message.correlation_id.clone());
    field("deliveryMode", message.delivery_mode.map(|m| m.to_string()));
    field("expiration", message.expiration.map(|e| e.to_string()));
    field("priority", message.priority.map(|p| p.to_string()));
    field("redelivered", message.redelivered.map(|r| r.to_string()));
    field("replyTo", message.reply_to.as_ref().map(|d| d.name().to_string()));
    field("type", message.message_type.clone());

    fields
}

fn body(message: &Message) -> BodyVariant {
    match &message.body {
        MessageBody::Bytes(bytes) => BodyVariant::Bytes { length: bytes.len() },
        MessageBody::Map(entries) => BodyVariant::Map {
            entries: entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect(),
        },
        MessageBody::Object(value) => BodyVariant::Object { text: value.to_string() },
        MessageBody::Stream(_) => BodyVariant::Stream,
        MessageBody::Text(text) => BodyVariant::Text { text: text.clone() },
        MessageBody::Other { .. } => BodyVariant::Unsupported {
            diagnostic: format!("unsupported message body type in {}", message.id),
        },
    }
}
