//! Sentinel-prefix stripping for streamed answers.
//!
//! The backend opens every stream with the fixed phrase "생성 중..."
//! ("generating...") and sometimes whitespace/BOM padding before the real
//! content. The stripper removes that prefix from the *logical* start of
//! the concatenated stream: while the accumulated head is still a prefix of
//! the sentinel it is held back, and released only once the head provably
//! diverges or the full sentinel has been consumed. A sentinel split across
//! chunk boundaries therefore never leaks into the display.

/// The generation-in-progress phrase emitted by the backend.
pub const SENTINEL: &str = "생성 중...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StripState {
    /// Still deciding whether the head is sentinel/padding.
    Deciding,
    /// Real content has started; everything passes through.
    Passthrough,
}

/// Stateful stripper applied to the chunks of one stream.
#[derive(Debug)]
pub struct SentinelStripper {
    state: StripState,
    /// Undecided head of the stream (never contains padding characters).
    held: String,
    /// Only one sentinel occurrence is stripped per stream.
    sentinel_consumed: bool,
}

impl Default for SentinelStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl SentinelStripper {
    pub fn new() -> Self {
        Self {
            state: StripState::Deciding,
            held: String::new(),
            sentinel_consumed: false,
        }
    }

    /// Feeds one chunk; returns the text that may be displayed now.
    ///
    /// The return value is empty while the head of the stream is still an
    /// ambiguous sentinel prefix.
    pub fn push(&mut self, chunk: &str) -> String {
        if self.state == StripState::Passthrough {
            return chunk.to_string();
        }

        self.held.push_str(chunk);
        self.drain_decided()
    }

    /// Flushes any held text at end-of-stream.
    ///
    /// If the stream ended while the head was still an incomplete sentinel
    /// prefix (e.g. the whole body was "생성"), the held text is real
    /// content after all and is released.
    pub fn finish(&mut self) -> String {
        self.state = StripState::Passthrough;
        std::mem::take(&mut self.held)
    }

    fn drain_decided(&mut self) -> String {
        // Padding is skipped character by character, so chunk boundaries
        // inside a whitespace run are harmless.
        loop {
            let Some(first) = self.held.chars().next() else {
                return String::new();
            };
            if is_padding(first) && !self.sentinel_consumed {
                self.held.drain(..first.len_utf8());
                continue;
            }

            if !self.sentinel_consumed {
                if self.held.starts_with(SENTINEL) {
                    self.held.drain(..SENTINEL.len());
                    self.sentinel_consumed = true;
                    continue;
                }
                if SENTINEL.starts_with(self.held.as_str()) {
                    // Strict prefix: hold until more bytes decide it.
                    return String::new();
                }
            }

            // Head diverges from the sentinel: this is real content.
            self.state = StripState::Passthrough;
            return std::mem::take(&mut self.held);
        }
    }
}

/// Whitespace, BOM, and zero-width characters the backend pads with.
fn is_padding(c: char) -> bool {
    c.is_whitespace() || c == '\u{200B}' || c == '\u{FEFF}'
}
