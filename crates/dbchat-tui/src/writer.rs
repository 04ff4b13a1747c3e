//! Paced output writer.
//!
//! Streamed answers arrive from the network in irregular, often large
//! bursts. Dumping them into the transcript as-is defeats the typing
//! effect, so the writer buffers incoming chunks and releases them at a
//! bounded rate: the runtime's tick drives `on_tick`, which removes up to
//! `chars_per_tick` characters from the front of the queue.
//!
//! Appends and drains are serialized by the single-threaded event loop, so
//! the queue needs no locking. The queue is deliberately unbounded; the
//! backend terminates every stream, and the client applies no backpressure.

/// Lifecycle of one streamed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Nothing pushed yet.
    Idle,
    /// Draining, or waiting for more input.
    Running,
    /// Queue emptied after `finish`; no further output.
    Stopped,
    /// Terminated by `cancel`; pushes are ignored. Terminal.
    Cancelled,
}

/// Rate-limited display buffer for one streamed response.
#[derive(Debug)]
pub struct PacedWriter {
    /// Characters received but not yet displayed.
    queue: String,
    /// Max characters released per tick (always >= 1).
    chars_per_tick: usize,
    /// Set by `finish`: drain to empty, then stop.
    done_reading: bool,
    state: WriterState,
}

impl PacedWriter {
    pub fn new(chars_per_tick: usize) -> Self {
        Self {
            queue: String::new(),
            chars_per_tick: chars_per_tick.max(1),
            done_reading: false,
            state: WriterState::Idle,
        }
    }

    /// Appends a chunk to the queue and starts the drain if idle.
    ///
    /// Chunks arriving after `cancel` are dropped; the writer is terminated.
    pub fn push(&mut self, chunk: &str) {
        match self.state {
            WriterState::Cancelled | WriterState::Stopped => {}
            WriterState::Idle | WriterState::Running => {
                self.queue.push_str(chunk);
                self.state = WriterState::Running;
            }
        }
    }

    /// Marks that no further chunks will arrive. The drain continues until
    /// the queue is empty, then the writer stops itself.
    pub fn finish(&mut self) {
        if matches!(self.state, WriterState::Idle | WriterState::Running) {
            self.done_reading = true;
            self.state = WriterState::Running;
        }
    }

    /// Stops the drain immediately, discarding any queued text.
    pub fn cancel(&mut self) {
        self.state = WriterState::Cancelled;
        self.queue.clear();
    }

    /// One drain step, called by the runtime at the tick cadence.
    ///
    /// Returns the characters to append to the display, or `None` on a
    /// no-op tick. An empty queue with `finish` called transitions to
    /// `Stopped`; an empty queue without it idles awaiting more input.
    pub fn on_tick(&mut self) -> Option<String> {
        if self.state != WriterState::Running {
            return None;
        }
        if self.queue.is_empty() {
            if self.done_reading {
                self.state = WriterState::Stopped;
            }
            return None;
        }

        let split = self
            .queue
            .char_indices()
            .nth(self.chars_per_tick)
            .map_or(self.queue.len(), |(idx, _)| idx);
        let rest = self.queue.split_off(split);
        let take = std::mem::replace(&mut self.queue, rest);

        if self.queue.is_empty() && self.done_reading {
            self.state = WriterState::Stopped;
        }
        Some(take)
    }

    /// True while ticks should keep coming (running, or idle with input pending).
    pub fn is_running(&self) -> bool {
        self.state == WriterState::Running
    }

    /// True once the drain has completed after `finish`.
    pub fn is_stopped(&self) -> bool {
        self.state == WriterState::Stopped
    }

    /// Characters still queued (diagnostics only).
    pub fn queued_chars(&self) -> usize {
        self.queue.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drains the writer to completion, returning (output, ticks taken).
    fn drain_all(writer: &mut PacedWriter) -> (String, usize) {
        let mut out = String::new();
        let mut ticks = 0;
        while !writer.is_stopped() {
            ticks += 1;
            if let Some(take) = writer.on_tick() {
                out.push_str(&take);
            }
            assert!(ticks < 10_000, "writer failed to stop");
        }
        (out, ticks)
    }

    #[test]
    fn test_drains_n_chars_in_ceil_n_over_rate_ticks() {
        for (total, rate) in [(10usize, 3usize), (9, 3), (1, 5), (100, 7), (5, 1)] {
            let mut writer = PacedWriter::new(rate);
            writer.push(&"x".repeat(total));
            writer.finish();

            let (out, ticks) = drain_all(&mut writer);
            assert_eq!(out.len(), total);
            assert_eq!(ticks, total.div_ceil(rate));
        }
    }

    #[test]
    fn test_at_least_one_char_per_tick() {
        // A configured rate of zero still makes progress.
        let mut writer = PacedWriter::new(0);
        writer.push("ab");
        writer.finish();

        assert_eq!(writer.on_tick().as_deref(), Some("a"));
        assert_eq!(writer.on_tick().as_deref(), Some("b"));
        assert!(writer.is_stopped());
    }

    #[test]
    fn test_drains_characters_not_bytes() {
        let mut writer = PacedWriter::new(2);
        writer.push("생성 중");
        writer.finish();

        assert_eq!(writer.on_tick().as_deref(), Some("생성"));
        assert_eq!(writer.on_tick().as_deref(), Some(" 중"));
        assert!(writer.is_stopped());
    }

    #[test]
    fn test_cancel_stops_all_output_with_queue_remaining() {
        let mut writer = PacedWriter::new(1);
        writer.push("hello");
        assert_eq!(writer.on_tick().as_deref(), Some("h"));

        writer.cancel();
        assert_eq!(writer.on_tick(), None);
        assert!(!writer.is_running());
        assert!(!writer.is_stopped());
    }

    #[test]
    fn test_push_after_cancel_is_ignored() {
        let mut writer = PacedWriter::new(4);
        writer.push("abc");
        writer.cancel();

        writer.push("resumed?");
        writer.finish();
        assert_eq!(writer.on_tick(), None);
        assert_eq!(writer.queued_chars(), 0);
    }

    #[test]
    fn test_finish_on_empty_queue_stops_within_one_tick() {
        let mut writer = PacedWriter::new(3);
        writer.finish();
        assert!(writer.is_running());

        assert_eq!(writer.on_tick(), None);
        assert!(writer.is_stopped());
    }

    #[test]
    fn test_empty_queue_without_finish_idles() {
        let mut writer = PacedWriter::new(3);
        writer.push("ab");
        assert_eq!(writer.on_tick().as_deref(), Some("ab"));

        // No finish yet: no-op ticks, then a late chunk resumes the drain.
        assert_eq!(writer.on_tick(), None);
        assert!(writer.is_running());

        writer.push("cd");
        writer.finish();
        assert_eq!(writer.on_tick().as_deref(), Some("cd"));
        assert!(writer.is_stopped());
    }

    #[test]
    fn test_bursty_pushes_drain_at_fixed_rate() {
        let mut writer = PacedWriter::new(4);
        writer.push("aaaaaaaaaa"); // 10 chars in one burst
        writer.push("bb");
        writer.finish();

        let (out, ticks) = drain_all(&mut writer);
        assert_eq!(out, "aaaaaaaaaabb");
        assert_eq!(ticks, 3); // ceil(12 / 4)
    }
}
