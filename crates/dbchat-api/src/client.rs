//! Typed client for the dbchat backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use dbchat_core::config::Config;

use crate::error::ApiError;
use crate::stream::{AnswerChunks, TextChunks};
use crate::types::{
    AskRequest, AskResponse, AskStreamRequest, Message, MessagesResponse, NewThreadResponse,
    RenameRequest, ThreadSummary, ThreadsResponse,
};

/// Header carrying the anti-forgery token on mutating requests.
const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for the dbchat backend.
///
/// Holds a cookie jar so the anti-forgery cookie set by the server can be
/// mirrored into the [`CSRF_HEADER`] on every mutating request.
pub struct ApiClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    /// Base for `/dbchat/*` thread endpoints.
    site_base: Url,
    /// Base for the streaming ask endpoint.
    api_base: Url,
    csrf_cookie: String,
}

impl ApiClient {
    /// Builds a client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let site_base = Url::parse(config.site_base.trim_end_matches('/'))
            .with_context(|| format!("Invalid site_base URL: {}", config.site_base))?;
        let api_base = Url::parse(config.api_base.trim_end_matches('/'))
            .with_context(|| format!("Invalid api_base URL: {}", config.api_base))?;

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            jar,
            site_base,
            api_base,
            csrf_cookie: config.csrf_cookie.clone(),
        })
    }

    fn site_url(&self, path: &str) -> String {
        format!("{}{path}", self.site_base.as_str().trim_end_matches('/'))
    }

    /// Reads the anti-forgery token from the cookie jar, if the server has
    /// issued one.
    fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.site_base)?;
        let cookies = header.to_str().ok()?;
        cookies.split("; ").find_map(|pair| {
            pair.strip_prefix(self.csrf_cookie.as_str())?
                .strip_prefix('=')
                .map(str::to_string)
        })
    }

    /// Starts a mutating request with the CSRF header attached.
    fn mutating(&self, method: Method, url: String) -> RequestBuilder {
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.csrf_token() {
            builder = builder.header(CSRF_HEADER, token);
        }
        builder
    }

    /// Maps a non-success status to a structured error, reading the body
    /// for detail text.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "backend request failed");
        Err(ApiError::http_status(status.as_u16(), &body))
    }

    /// `GET /dbchat/threads`
    pub async fn list_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        let response = self
            .http
            .get(self.site_url("/dbchat/threads"))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let data: ThreadsResponse = response.json().await?;
        tracing::debug!(count = data.threads.len(), "loaded thread list");
        Ok(data.threads)
    }

    /// `GET /dbchat/threads/{id}/messages`
    pub async fn thread_messages(&self, thread_id: &str) -> Result<Vec<Message>, ApiError> {
        let response = self
            .http
            .get(self.site_url(&format!("/dbchat/threads/{thread_id}/messages")))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let data: MessagesResponse = response.json().await?;
        Ok(data.messages)
    }

    /// `POST /dbchat/threads/new` — returns the new thread id.
    pub async fn create_thread(&self) -> Result<String, ApiError> {
        let response = self
            .mutating(Method::POST, self.site_url("/dbchat/threads/new"))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let data: NewThreadResponse = response.json().await?;
        Ok(data.thread_id)
    }

    /// `POST /dbchat/threads/{id}/rename`
    ///
    /// Empty titles are rejected by the UI before a request is made; the
    /// backend enforces it too.
    pub async fn rename_thread(&self, thread_id: &str, title: &str) -> Result<(), ApiError> {
        let response = self
            .mutating(
                Method::POST,
                self.site_url(&format!("/dbchat/threads/{thread_id}/rename")),
            )
            .json(&RenameRequest { title })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `DELETE /dbchat/threads/{id}/delete`
    pub async fn delete_thread(&self, thread_id: &str) -> Result<(), ApiError> {
        let response = self
            .mutating(
                Method::DELETE,
                self.site_url(&format!("/dbchat/threads/{thread_id}/delete")),
            )
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /dbchat/ask` — the atomic (non-streaming) ask flow.
    pub async fn ask(
        &self,
        thread_id: Option<&str>,
        question: &str,
        options: Value,
        ui_context: Value,
    ) -> Result<AskResponse, ApiError> {
        let response = self
            .mutating(Method::POST, self.site_url("/dbchat/ask"))
            .json(&AskRequest {
                thread_id,
                question,
                options,
                ui_context,
            })
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// `POST {api_base}/ask_stream` — returns decoded text chunks.
    ///
    /// The caller is responsible for sentinel stripping and pacing; this
    /// just turns the byte stream into UTF-8 text.
    pub async fn ask_stream(&self, question: &str) -> Result<AnswerChunks, ApiError> {
        let url = format!(
            "{}/ask_stream",
            self.api_base.as_str().trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .json(&AskStreamRequest { question })
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(TextChunks::new(response.bytes_stream().boxed()))
    }
}
