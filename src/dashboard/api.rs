//! JSON endpoints. Broker calls block, so each request runs its pipeline on
//! the blocking pool; the session never leaves that worker.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use crate::browser::MessageDetail;
use crate::dashboard::models::{ErrorBody, HealthSnapshot, MessageRow, QueueEntry, QueueListing};
use crate::error::{BrowserError, Result};
use crate::QueueBrowserEngine;

pub struct ApiError(pub BrowserError);

impl From<BrowserError> for ApiError {
    fn from(err: BrowserError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_not_found() => StatusCode::NOT_FOUND,
            BrowserError::Connection { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, kind = self.0.kind(), "request failed");
        } else {
            debug!(error = %self.0, kind = self.0.kind(), "request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BrowserError::Worker(e.to_string()))?
}

pub async fn health(State(engine): State<QueueBrowserEngine>) -> impl IntoResponse {
    Json(HealthSnapshot {
        status: "ok",
        uptime_seconds: engine.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn list_queues(State(engine): State<QueueBrowserEngine>) -> Result<Json<Vec<QueueEntry>>, ApiError> {
    let queues = run_blocking(move || engine.list_queues()).await?;
    Ok(Json(queues.iter().map(QueueEntry::from).collect()))
}

pub async fn list_messages(
    State(engine): State<QueueBrowserEngine>,
    Path(queue): Path<String>,
) -> Result<Json<QueueListing>, ApiError> {
    let name = queue.clone();
    let summaries = run_blocking(move || engine.list_messages(&name)).await?;
    let messages: Vec<MessageRow> = summaries.into_iter().map(MessageRow::from).collect();
    Ok(Json(QueueListing {
        queue,
        count: messages.len(),
        messages,
    }))
}

pub async fn show_message(
    State(engine): State<QueueBrowserEngine>,
    Path((queue, message_id)): Path<(String, String)>,
) -> Result<Json<MessageDetail>, ApiError> {
    let detail = run_blocking(move || engine.show_message(&queue, &message_id)).await?;
    Ok(Json(detail))
}
