//! HTTP client for the dbchat backend.
//!
//! Wraps the thread CRUD endpoints under `/dbchat/` and the two ask flows:
//! the atomic `POST /dbchat/ask` and the streamed `POST {api_base}/ask_stream`.

pub mod client;
pub mod error;
pub mod sentinel;
pub mod stream;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiErrorKind};
pub use sentinel::SentinelStripper;
pub use stream::{AnswerChunks, TextChunks};
pub use types::{AskResponse, Message, Role, ThreadSummary};
