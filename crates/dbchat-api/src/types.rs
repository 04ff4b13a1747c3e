//! Wire types for the dbchat backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted conversation, as listed by `GET /dbchat/threads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub updated_at: String,
}

impl ThreadSummary {
    /// Title for display; empty or whitespace-only titles fall back to a
    /// placeholder.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => "New conversation",
        }
    }
}

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    /// Roles this client doesn't know about are tolerated, not fatal.
    #[serde(other)]
    Other,
}

/// One stored message of a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadsResponse {
    #[serde(default)]
    pub threads: Vec<ThreadSummary>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct NewThreadResponse {
    pub thread_id: String,
}

#[derive(Debug, Serialize)]
pub struct RenameRequest<'a> {
    pub title: &'a str,
}

/// Body of the atomic `POST /dbchat/ask`.
///
/// `options` and `ui_context` are opaque to this client; the backend stores
/// them verbatim for debugging.
#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub thread_id: Option<&'a str>,
    pub question: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub options: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub ui_context: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub thread_id: String,
    pub message: AskMessage,
}

#[derive(Debug, Serialize)]
pub struct AskStreamRequest<'a> {
    pub question: &'a str,
}
