//! Effect handler implementations.
//!
//! Handlers are pure async functions that perform one backend call and
//! return the `UiEvent` describing its outcome. The runtime spawns them
//! and routes the returned event through the inbox.

use std::sync::Arc;

use tokio::sync::mpsc;

use dbchat_api::{ApiClient, ApiError, SentinelStripper};
use futures_util::StreamExt;

use crate::events::{StreamEvent, UiEvent};

pub async fn load_threads(client: Arc<ApiClient>) -> UiEvent {
    UiEvent::ThreadsLoaded(client.list_threads().await)
}

pub async fn load_messages(client: Arc<ApiClient>, thread_id: String) -> UiEvent {
    let result = client.thread_messages(&thread_id).await;
    UiEvent::MessagesLoaded { thread_id, result }
}

pub async fn create_thread(client: Arc<ApiClient>) -> UiEvent {
    UiEvent::ThreadCreated(client.create_thread().await)
}

pub async fn rename_thread(client: Arc<ApiClient>, thread_id: String, title: String) -> UiEvent {
    let result = client.rename_thread(&thread_id, &title).await;
    UiEvent::ThreadRenamed {
        thread_id,
        title,
        result,
    }
}

pub async fn delete_thread(client: Arc<ApiClient>, thread_id: String) -> UiEvent {
    let result = client.delete_thread(&thread_id).await;
    UiEvent::ThreadDeleted { thread_id, result }
}

pub async fn ask(
    client: Arc<ApiClient>,
    seq: u64,
    thread_id: Option<String>,
    question: String,
) -> UiEvent {
    let result = client
        .ask(
            thread_id.as_deref(),
            &question,
            serde_json::Value::Null,
            serde_json::Value::Null,
        )
        .await;
    UiEvent::AskCompleted { seq, result }
}

/// Runs one streamed ask, forwarding sentinel-stripped chunks to `tx`.
///
/// If the receiver is dropped (the user cancelled) the first failed send
/// ends the task, which also drops the HTTP response and closes the
/// connection.
pub async fn run_stream(
    client: Arc<ApiClient>,
    question: String,
    tx: mpsc::UnboundedSender<StreamEvent>,
) {
    let mut chunks = match client.ask_stream(&question).await {
        Ok(chunks) => chunks,
        Err(e) => {
            let _ = tx.send(StreamEvent::Failed(e));
            return;
        }
    };

    let mut stripper = SentinelStripper::new();
    let mut sent_any = false;

    while let Some(item) = chunks.next().await {
        match item {
            Ok(text) => {
                let visible = stripper.push(&text);
                if !visible.is_empty() {
                    sent_any = true;
                    if tx.send(StreamEvent::Chunk(visible)).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "answer stream failed");
                let _ = tx.send(StreamEvent::Failed(e));
                return;
            }
        }
    }

    let tail = stripper.finish();
    if !tail.is_empty() {
        sent_any = true;
        if tx.send(StreamEvent::Chunk(tail)).is_err() {
            return;
        }
    }

    if sent_any {
        let _ = tx.send(StreamEvent::Done);
    } else {
        // The body was empty or sentinel-only; nothing was displayable.
        let _ = tx.send(StreamEvent::Failed(ApiError::empty_body()));
    }
}
