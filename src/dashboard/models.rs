use serde::Serialize;

use crate::broker::QueueRef;
use crate::browser::MessageSummary;
use crate::utils::utils_time::format_timestamp_ms;

/// Each name is one path segment; reserved characters are percent-encoded.
pub fn queue_uri(queue: &str) -> String {
    format!("/api/queues/{}", urlencoding::encode(queue))
}

pub fn message_uri(queue: &str, message_id: &str) -> String {
    format!("{}/{}", queue_uri(queue), urlencoding::encode(message_id))
}

#[derive(Serialize)]
pub struct QueueEntry {
    pub name: String,
    pub uri: String,
}

impl From<&QueueRef> for QueueEntry {
    fn from(queue: &QueueRef) -> Self {
        Self {
            name: queue.name().to_string(),
            uri: queue_uri(queue.name()),
        }
    }
}

#[derive(Serialize)]
pub struct MessageRow {
    pub id: String,
    pub timestamp: u64,
    pub timestamp_display: String,
    pub queue: String,
    pub uri: String,
}

impl From<MessageSummary> for MessageRow {
    fn from(summary: MessageSummary) -> Self {
        Self {
            uri: message_uri(&summary.queue, &summary.id),
            timestamp_display: format_timestamp_ms(summary.timestamp),
            id: summary.id,
            timestamp: summary.timestamp,
            queue: summary.queue,
        }
    }
}

#[derive(Serialize)]
pub struct QueueListing {
    pub queue: String,
    pub count: usize,
    pub messages: Vec<MessageRow>,
}

#[derive(Serialize)]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub server_time: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}
