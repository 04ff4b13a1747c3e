//! Incremental UTF-8 decoding of streamed response bodies.
//!
//! `ask_stream` bodies arrive as raw bytes that can split multi-byte
//! sequences at chunk boundaries. `TextChunks` wraps the byte stream and
//! yields decoded `String` chunks, carrying incomplete trailing sequences
//! over to the next chunk. Invalid bytes become U+FFFD.

use std::fmt;
use std::pin::Pin;
use std::str;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream::BoxStream;

use crate::error::ApiError;

/// Replacement character emitted for invalid byte sequences.
const REPLACEMENT: char = '\u{FFFD}';

/// The decoded chunk stream handed out by `ApiClient::ask_stream`.
pub type AnswerChunks = TextChunks<BoxStream<'static, Result<Bytes, reqwest::Error>>>;

/// Adapts a byte stream into a stream of decoded text chunks.
pub struct TextChunks<S> {
    inner: S,
    /// Incomplete trailing UTF-8 sequence from the previous chunk.
    carry: Vec<u8>,
    finished: bool,
}

impl<S> fmt::Debug for TextChunks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChunks")
            .field("carry", &self.carry)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<S> TextChunks<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            carry: Vec::new(),
            finished: false,
        }
    }

    /// Decodes everything decodable in `carry`, leaving at most one
    /// incomplete trailing sequence behind.
    fn decode_carry(&mut self) -> String {
        let mut out = String::new();
        let mut rest: &[u8] = &self.carry;

        loop {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(s) = str::from_utf8(valid) {
                        out.push_str(s);
                    }
                    match e.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            rest = &after[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end: keep for the
                            // next chunk.
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.carry = rest.to_vec();
        out
    }
}

impl<S, E> Stream for TextChunks<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<ApiError>,
{
    type Item = Result<String, ApiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.carry.extend_from_slice(&bytes);
                    let text = this.decode_carry();
                    if text.is_empty() {
                        // Only an incomplete sequence so far; read on.
                        continue;
                    }
                    return Poll::Ready(Some(Ok(text)));
                }
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    if this.carry.is_empty() {
                        return Poll::Ready(None);
                    }
                    // Truncated trailing sequence at end-of-stream.
                    this.carry.clear();
                    return Poll::Ready(Some(Ok(REPLACEMENT.to_string())));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::from_reqwest(&e)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{StreamExt, stream};

    use super::*;

    async fn collect(chunks: Vec<&'static [u8]>) -> Vec<String> {
        let inner = stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, ApiError>(Bytes::from_static(c))),
        );
        let mut out = Vec::new();
        let mut text = TextChunks::new(inner);
        while let Some(item) = text.next().await {
            out.push(item.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_ascii_passthrough() {
        let out = collect(vec![b"Hello, ", b"world"]).await;
        assert_eq!(out, vec!["Hello, ", "world"]);
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        // "생" is 0xEC 0x83 0x9D; split it mid-sequence.
        let out = collect(vec![&[0xEC, 0x83], &[0x9D, b'!']]).await;
        assert_eq!(out.concat(), "생!");
    }

    #[tokio::test]
    async fn test_invalid_byte_becomes_replacement() {
        let out = collect(vec![&[b'a', 0xFF, b'b']]).await;
        assert_eq!(out.concat(), "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_truncated_tail_becomes_replacement() {
        let out = collect(vec![&[b'x', 0xEC, 0x83]]).await;
        assert_eq!(out.concat(), "x\u{FFFD}");
    }

    #[tokio::test]
    async fn test_error_terminates_stream() {
        let inner = stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(ApiError::network("boom")),
        ]);
        let mut text = TextChunks::new(inner);
        assert_eq!(text.next().await.unwrap().unwrap(), "ok");
        assert!(text.next().await.unwrap().is_err());
        assert!(text.next().await.is_none());
    }
}
