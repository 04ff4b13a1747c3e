//! Pure reducer: `update(state, event) -> effects`.
//!
//! The reducer mutates state and returns effects for the runtime to
//! execute. It never performs I/O, so every interaction is testable by
//! constructing a state, feeding events, and asserting on state + effects.

use crossterm::event::{Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use dbchat_api::{ApiError, ApiErrorKind};

use crate::chat::Bubble;
use crate::effects::UiEffect;
use crate::events::{StreamEvent, UiEvent};
use crate::overlays::Overlay;
use crate::state::{AppState, AskState};

/// Message shown when a stream or ask produced no answer at all.
const EMPTY_ANSWER_TEXT: &str = "Failed to load a response.";

/// Processes one event, mutating state and returning effects.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            state.tui.spinner_frame = state.tui.spinner_frame.wrapping_add(1);
            on_tick(state);
            Vec::new()
        }

        UiEvent::Terminal(TerminalEvent::Key(key)) if key.kind != KeyEventKind::Release => {
            if state.overlay.is_some() {
                handle_overlay_key(state, &key)
            } else {
                handle_key(state, &key)
            }
        }
        UiEvent::Terminal(_) => Vec::new(),

        UiEvent::StreamStarted { rx } => {
            // Only accept the channel if the submit is still pending; an
            // Esc in between already cancelled the question.
            if matches!(state.tui.ask, AskState::Asking { .. }) {
                state.tui.ask = AskState::Waiting { rx };
            }
            Vec::new()
        }

        UiEvent::Stream(stream_event) => handle_stream(state, stream_event),

        UiEvent::ThreadsLoaded(Ok(threads)) => {
            state.tui.threads.set_threads(threads);
            if !state.tui.threads.loaded_once {
                state.tui.threads.loaded_once = true;
                // Open the newest thread on startup.
                if state.tui.threads.current.is_none()
                    && let Some(first) = state.tui.threads.threads.first()
                {
                    let thread_id = first.id.clone();
                    state.tui.threads.current = Some(thread_id.clone());
                    return vec![UiEffect::LoadMessages { thread_id }];
                }
            }
            Vec::new()
        }
        UiEvent::ThreadsLoaded(Err(e)) => {
            state.tui.notice = Some(format!("Could not load threads: {e}"));
            Vec::new()
        }

        UiEvent::MessagesLoaded { thread_id, result } => {
            // Ignore a stale load if the user already moved on.
            if state.tui.threads.current.as_deref() != Some(thread_id.as_str()) {
                return Vec::new();
            }
            match result {
                Ok(messages) => state.tui.chat.load_messages(messages),
                Err(e) => state.tui.notice = Some(format!("Could not load messages: {e}")),
            }
            Vec::new()
        }

        UiEvent::ThreadCreated(Ok(thread_id)) => {
            state.tui.threads.current = Some(thread_id);
            state.tui.chat.clear();
            vec![UiEffect::LoadThreads]
        }
        UiEvent::ThreadCreated(Err(e)) => {
            state.tui.notice = Some(format!("Could not create thread: {e}"));
            Vec::new()
        }

        UiEvent::ThreadRenamed {
            thread_id,
            title,
            result,
        } => match result {
            Ok(()) => {
                state.tui.threads.apply_rename(&thread_id, &title);
                vec![UiEffect::LoadThreads]
            }
            Err(e) => {
                state.tui.notice = Some(format!("Rename failed: {e}"));
                Vec::new()
            }
        },

        UiEvent::ThreadDeleted { thread_id, result } => match result {
            Ok(()) => {
                if state.tui.threads.remove(&thread_id) {
                    // The open thread is gone; the transcript goes with it.
                    state.tui.chat.clear();
                }
                vec![UiEffect::LoadThreads]
            }
            Err(e) => {
                state.tui.notice = Some(format!("Delete failed: {e}"));
                Vec::new()
            }
        },

        UiEvent::AskCompleted { seq, result } => {
            // A result for anything but the live question is stale: the
            // user cancelled it (and may have submitted a new one since).
            if !matches!(state.tui.ask, AskState::Asking { seq: live } if live == seq) {
                return Vec::new();
            }
            state.tui.ask = AskState::Idle;
            match result {
                Ok(answer) => {
                    let content = answer.message.content;
                    if content.trim().is_empty() {
                        state
                            .tui
                            .chat
                            .replace_pending(Bubble::Error(EMPTY_ANSWER_TEXT.to_string()));
                    } else {
                        state.tui.chat.replace_pending(Bubble::Ai {
                            content,
                            streaming: false,
                        });
                    }
                    state.tui.threads.current = Some(answer.thread_id);
                    vec![UiEffect::LoadThreads]
                }
                Err(e) => {
                    state.tui.chat.replace_pending(Bubble::Error(error_text(&e)));
                    Vec::new()
                }
            }
        }
    }
}

/// Tick step: advance the paced writer and finish a drained stream.
fn on_tick(state: &mut AppState) {
    if let AskState::Streaming { writer, .. } | AskState::Draining { writer } = &mut state.tui.ask
        && let Some(text) = writer.on_tick()
    {
        state.tui.chat.append_streaming(&text);
    }

    if let AskState::Draining { writer } = &state.tui.ask
        && writer.is_stopped()
    {
        state.tui.chat.finalize_streaming();
        state.tui.ask = AskState::Idle;
    }
}

fn handle_stream(state: &mut AppState, event: StreamEvent) -> Vec<UiEffect> {
    match event {
        StreamEvent::Chunk(text) => {
            match std::mem::replace(&mut state.tui.ask, AskState::Idle) {
                AskState::Waiting { rx } => {
                    // First displayable chunk: swap the typing dots for a
                    // live answer bubble and start the drain.
                    let mut writer = state.tui.new_writer();
                    writer.push(&text);
                    state.tui.chat.replace_pending(Bubble::Ai {
                        content: String::new(),
                        streaming: true,
                    });
                    state.tui.ask = AskState::Streaming { rx, writer };
                }
                AskState::Streaming { rx, mut writer } => {
                    writer.push(&text);
                    state.tui.ask = AskState::Streaming { rx, writer };
                }
                // Late chunk after cancel or completion: drop it.
                other => state.tui.ask = other,
            }
            Vec::new()
        }

        StreamEvent::Done => {
            match std::mem::replace(&mut state.tui.ask, AskState::Idle) {
                AskState::Streaming { mut writer, .. } => {
                    writer.finish();
                    state.tui.ask = AskState::Draining { writer };
                }
                AskState::Waiting { .. } | AskState::Asking { .. } => {
                    // Stream ended without a single displayable chunk.
                    state
                        .tui
                        .chat
                        .replace_pending(Bubble::Error(EMPTY_ANSWER_TEXT.to_string()));
                }
                other => state.tui.ask = other,
            }
            Vec::new()
        }

        StreamEvent::Failed(e) => {
            let had_content = state.tui.chat.streaming_has_content();
            if let AskState::Streaming { mut writer, .. } =
                std::mem::replace(&mut state.tui.ask, AskState::Idle)
            {
                writer.cancel();
            }
            if had_content {
                // Keep the partial answer; the error follows it.
                state.tui.chat.finalize_streaming();
                state.tui.chat.push(Bubble::Error(error_text(&e)));
            } else {
                state.tui.chat.replace_pending(Bubble::Error(error_text(&e)));
            }
            Vec::new()
        }
    }
}

fn handle_key(state: &mut AppState, key: &KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c' | 'q') if ctrl => return vec![UiEffect::Quit],

        KeyCode::Esc => {
            cancel_ask(state);
            return Vec::new();
        }

        KeyCode::Enter => {
            let streaming = !key.modifiers.contains(KeyModifiers::ALT);
            return submit_question(state, streaming);
        }

        KeyCode::Char('n') if ctrl => {
            if !state.tui.ask.is_busy() {
                return vec![UiEffect::CreateThread];
            }
        }

        KeyCode::Char('r') if ctrl => {
            if !state.tui.ask.is_busy()
                && let Some(thread) = state.tui.threads.selected_thread()
            {
                state.overlay = Some(Overlay::rename(
                    &thread.id,
                    thread.title.as_deref().unwrap_or(""),
                ));
            }
        }

        KeyCode::Char('d') if ctrl => {
            if !state.tui.ask.is_busy()
                && let Some(thread) = state.tui.threads.selected_thread()
            {
                state.overlay = Some(Overlay::confirm_delete(&thread.id, thread.display_title()));
            }
        }

        KeyCode::Up | KeyCode::Down if !state.tui.ask.is_busy() => {
            let changed = if key.code == KeyCode::Up {
                state.tui.threads.select_prev()
            } else {
                state.tui.threads.select_next()
            };
            if let Some(thread_id) = changed {
                state.tui.threads.current = Some(thread_id.clone());
                state.tui.chat.clear();
                return vec![UiEffect::LoadMessages { thread_id }];
            }
        }

        KeyCode::PageUp => state.tui.chat.scroll_up(10),
        KeyCode::PageDown => state.tui.chat.scroll_down(10),

        _ => {
            state.tui.input.handle_key(key);
        }
    }

    Vec::new()
}

/// Submits the question box through the streaming or atomic flow.
fn submit_question(state: &mut AppState, streaming: bool) -> Vec<UiEffect> {
    if state.tui.input.is_blank() || state.tui.ask.is_busy() {
        return Vec::new();
    }

    let question = state.tui.input.take().trim().to_string();
    state.tui.chat.push(Bubble::User(question.clone()));
    state.tui.chat.push(Bubble::Pending);
    let seq = state.tui.next_ask_seq();
    state.tui.ask = AskState::Asking { seq };

    if streaming {
        vec![UiEffect::StartStream { question }]
    } else {
        vec![UiEffect::Ask {
            seq,
            thread_id: state.tui.threads.current.clone(),
            question,
        }]
    }
}

/// Esc during a question: stop all output immediately.
///
/// Dropping the stream receiver makes the stream task's next send fail,
/// which aborts it; no dedicated cancel message is needed.
fn cancel_ask(state: &mut AppState) {
    if !state.tui.ask.is_busy() {
        return;
    }
    let had_content = state.tui.chat.streaming_has_content();
    if let AskState::Streaming { mut writer, .. } | AskState::Draining { mut writer } =
        std::mem::replace(&mut state.tui.ask, AskState::Idle)
    {
        writer.cancel();
    }
    if had_content {
        state.tui.chat.finalize_streaming();
    } else {
        state
            .tui
            .chat
            .replace_pending(Bubble::Error("Cancelled.".to_string()));
    }
    state.tui.notice = Some("Question cancelled".to_string());
}

fn handle_overlay_key(state: &mut AppState, key: &KeyEvent) -> Vec<UiEffect> {
    let Some(overlay) = state.overlay.as_mut() else {
        return Vec::new();
    };

    match overlay {
        Overlay::Rename {
            thread_id,
            input,
            error,
        } => match key.code {
            KeyCode::Esc => {
                state.overlay = None;
                Vec::new()
            }
            KeyCode::Enter => {
                let title = input.text().trim().to_string();
                if title.is_empty() {
                    // Rejected locally; no request is made.
                    *error = Some("Title cannot be empty".to_string());
                    return Vec::new();
                }
                let thread_id = thread_id.clone();
                state.overlay = None;
                vec![UiEffect::RenameThread { thread_id, title }]
            }
            _ => {
                if input.handle_key(key) {
                    *error = None;
                }
                Vec::new()
            }
        },

        Overlay::ConfirmDelete { thread_id, .. } => match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                let thread_id = thread_id.clone();
                state.overlay = None;
                vec![UiEffect::DeleteThread { thread_id }]
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                state.overlay = None;
                Vec::new()
            }
            _ => Vec::new(),
        },
    }
}

/// User-facing text for a failed request.
fn error_text(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::Network => "A network error occurred.".to_string(),
        ApiErrorKind::EmptyBody => EMPTY_ANSWER_TEXT.to_string(),
        ApiErrorKind::HttpStatus | ApiErrorKind::Parse => format!("Error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use dbchat_api::ThreadSummary;
    use dbchat_core::config::Config;

    use super::*;

    fn new_state() -> AppState {
        AppState::new(Config::default())
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(TerminalEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl_key(c: char) -> UiEvent {
        UiEvent::Terminal(TerminalEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            update(state, key(KeyCode::Char(c)));
        }
    }

    fn summary(id: &str, title: &str) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            title: Some(title.to_string()),
            updated_at: "2026-01-01 10:00".to_string(),
        }
    }

    #[test]
    fn test_submit_starts_stream_and_shows_pending() {
        let mut state = new_state();
        type_text(&mut state, "why is the db slow?");

        let effects = update(&mut state, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::StartStream {
                question: "why is the db slow?".to_string()
            }]
        );
        assert_eq!(
            state.tui.chat.bubbles,
            vec![
                Bubble::User("why is the db slow?".to_string()),
                Bubble::Pending
            ]
        );
        assert!(state.tui.ask.is_busy());
        assert_eq!(state.tui.input.text(), "");
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = new_state();
        type_text(&mut state, "   ");
        assert!(update(&mut state, key(KeyCode::Enter)).is_empty());
        assert!(state.tui.chat.bubbles.is_empty());
    }

    #[test]
    fn test_double_submit_is_ignored_while_busy() {
        let mut state = new_state();
        type_text(&mut state, "one");
        update(&mut state, key(KeyCode::Enter));

        type_text(&mut state, "two");
        assert!(update(&mut state, key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn test_alt_enter_uses_atomic_ask_with_current_thread() {
        let mut state = new_state();
        state.tui.threads.current = Some("t1".to_string());
        type_text(&mut state, "q");

        let effects = update(
            &mut state,
            UiEvent::Terminal(TerminalEvent::Key(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::ALT,
            ))),
        );
        assert_eq!(
            effects,
            vec![UiEffect::Ask {
                seq: 1,
                thread_id: Some("t1".to_string()),
                question: "q".to_string()
            }]
        );
    }

    #[test]
    fn test_first_chunk_replaces_pending_and_ticks_drain_it() {
        let mut state = new_state();
        state.tui.config.stream_cps = 40; // 2 chars per 50ms tick
        type_text(&mut state, "q");
        update(&mut state, key(KeyCode::Enter));

        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Chunk("abcd".to_string())),
        );
        assert!(matches!(state.tui.ask, AskState::Streaming { .. }));

        update(&mut state, UiEvent::Tick);
        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Ai {
                content: "ab".to_string(),
                streaming: true
            }
        );

        update(&mut state, UiEvent::Stream(StreamEvent::Done));
        update(&mut state, UiEvent::Tick);
        update(&mut state, UiEvent::Tick);
        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Ai {
                content: "abcd".to_string(),
                streaming: false
            }
        );
        assert!(!state.tui.ask.is_busy());
    }

    #[test]
    fn test_stream_failure_before_content_replaces_pending_with_error() {
        let mut state = new_state();
        type_text(&mut state, "q");
        update(&mut state, key(KeyCode::Enter));

        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Failed(ApiError::network("refused"))),
        );

        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Error("A network error occurred.".to_string())
        );
        assert!(!state.tui.ask.is_busy());
    }

    #[test]
    fn test_stream_failure_mid_body_keeps_partial_text() {
        let mut state = new_state();
        state.tui.config.stream_cps = 100;
        type_text(&mut state, "q");
        update(&mut state, key(KeyCode::Enter));

        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Chunk("partial".to_string())),
        );
        // Two ticks at 5 chars each drain all 7 characters.
        update(&mut state, UiEvent::Tick);
        update(&mut state, UiEvent::Tick);
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Failed(ApiError::http_status(500, ""))),
        );

        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Ai {
                content: "partial".to_string(),
                streaming: false
            }
        );
        assert_eq!(
            state.tui.chat.bubbles[2],
            Bubble::Error("Error: HTTP 500".to_string())
        );
    }

    #[test]
    fn test_esc_cancels_stream_and_stops_output() {
        let mut state = new_state();
        type_text(&mut state, "q");
        update(&mut state, key(KeyCode::Enter));

        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Chunk("never shown".to_string())),
        );
        update(&mut state, key(KeyCode::Esc));

        assert!(!state.tui.ask.is_busy());
        // No content had been displayed yet, so the placeholder reports it.
        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Error("Cancelled.".to_string())
        );

        // Further ticks and chunks produce nothing.
        update(
            &mut state,
            UiEvent::Stream(StreamEvent::Chunk("late".to_string())),
        );
        update(&mut state, UiEvent::Tick);
        assert_eq!(state.tui.chat.bubbles.len(), 2);
    }

    #[test]
    fn test_empty_stream_reports_failed_answer() {
        let mut state = new_state();
        type_text(&mut state, "q");
        update(&mut state, key(KeyCode::Enter));

        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        update(&mut state, UiEvent::Stream(StreamEvent::Done));

        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Error(EMPTY_ANSWER_TEXT.to_string())
        );
    }

    #[test]
    fn test_empty_rename_is_rejected_without_request() {
        let mut state = new_state();
        state.tui.threads.set_threads(vec![summary("t1", "Old")]);
        update(&mut state, ctrl_key('r'));
        assert!(state.overlay.is_some());

        // Clear the pre-filled title, then try to submit.
        for _ in 0..3 {
            update(&mut state, key(KeyCode::Backspace));
        }
        let effects = update(&mut state, key(KeyCode::Enter));

        assert!(effects.is_empty());
        let Some(Overlay::Rename { error, .. }) = &state.overlay else {
            panic!("rename overlay should stay open");
        };
        assert_eq!(error.as_deref(), Some("Title cannot be empty"));
    }

    #[test]
    fn test_rename_submit_emits_effect_and_closes_overlay() {
        let mut state = new_state();
        state.tui.threads.set_threads(vec![summary("t1", "Old")]);
        update(&mut state, ctrl_key('r'));
        type_text(&mut state, "er"); // "Old" -> "Older"

        let effects = update(&mut state, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::RenameThread {
                thread_id: "t1".to_string(),
                title: "Older".to_string()
            }]
        );
        assert!(state.overlay.is_none());
    }

    #[test]
    fn test_delete_current_thread_clears_transcript() {
        let mut state = new_state();
        state
            .tui
            .threads
            .set_threads(vec![summary("t1", "A"), summary("t2", "B")]);
        state.tui.threads.current = Some("t1".to_string());
        state.tui.chat.push(Bubble::User("old".to_string()));

        update(&mut state, ctrl_key('d'));
        assert!(matches!(
            state.overlay,
            Some(Overlay::ConfirmDelete { .. })
        ));
        let effects = update(&mut state, key(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![UiEffect::DeleteThread {
                thread_id: "t1".to_string()
            }]
        );

        let effects = update(
            &mut state,
            UiEvent::ThreadDeleted {
                thread_id: "t1".to_string(),
                result: Ok(()),
            },
        );
        assert_eq!(effects, vec![UiEffect::LoadThreads]);
        assert!(state.tui.chat.bubbles.is_empty());
        assert!(state.tui.threads.current.is_none());
    }

    #[test]
    fn test_delete_other_thread_keeps_transcript() {
        let mut state = new_state();
        state
            .tui
            .threads
            .set_threads(vec![summary("t1", "A"), summary("t2", "B")]);
        state.tui.threads.current = Some("t1".to_string());
        state.tui.chat.push(Bubble::User("kept".to_string()));

        update(
            &mut state,
            UiEvent::ThreadDeleted {
                thread_id: "t2".to_string(),
                result: Ok(()),
            },
        );
        assert_eq!(state.tui.chat.bubbles.len(), 1);
        assert_eq!(state.tui.threads.current.as_deref(), Some("t1"));
    }

    #[test]
    fn test_thread_navigation_loads_messages() {
        let mut state = new_state();
        state
            .tui
            .threads
            .set_threads(vec![summary("t1", "A"), summary("t2", "B")]);

        let effects = update(&mut state, key(KeyCode::Down));
        assert_eq!(
            effects,
            vec![UiEffect::LoadMessages {
                thread_id: "t2".to_string()
            }]
        );
        assert_eq!(state.tui.threads.current.as_deref(), Some("t2"));
    }

    #[test]
    fn test_stale_messages_load_is_ignored() {
        let mut state = new_state();
        state.tui.threads.current = Some("t2".to_string());
        update(
            &mut state,
            UiEvent::MessagesLoaded {
                thread_id: "t1".to_string(),
                result: Ok(Vec::new()),
            },
        );
        assert!(state.tui.chat.bubbles.is_empty());
        assert!(state.tui.notice.is_none());
    }

    #[test]
    fn test_ask_completed_sets_current_thread_and_reloads() {
        let mut state = new_state();
        type_text(&mut state, "q");
        update(
            &mut state,
            UiEvent::Terminal(TerminalEvent::Key(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::ALT,
            ))),
        );

        let answer = serde_json::from_str(
            r#"{"thread_id": "t7", "message": {"content": "42"}}"#,
        )
        .unwrap();
        let seq = state.tui.ask_seq;
        let effects = update(
            &mut state,
            UiEvent::AskCompleted {
                seq,
                result: Ok(answer),
            },
        );
        assert_eq!(effects, vec![UiEffect::LoadThreads]);
        assert_eq!(state.tui.threads.current.as_deref(), Some("t7"));
        assert_eq!(
            state.tui.chat.bubbles[1],
            Bubble::Ai {
                content: "42".to_string(),
                streaming: false
            }
        );
    }

    #[test]
    fn test_stale_ask_result_after_cancel_does_not_clobber_new_question() {
        let mut state = new_state();
        state.tui.threads.current = Some("t1".to_string());

        // First question goes through the atomic flow, then gets cancelled.
        type_text(&mut state, "first");
        update(
            &mut state,
            UiEvent::Terminal(TerminalEvent::Key(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::ALT,
            ))),
        );
        let AskState::Asking { seq: old_seq } = state.tui.ask else {
            panic!("submit should leave a question in flight");
        };
        update(&mut state, key(KeyCode::Esc));
        assert!(!state.tui.ask.is_busy());

        // Second question goes through the streaming flow.
        type_text(&mut state, "second");
        update(&mut state, key(KeyCode::Enter));
        let (_tx, rx) = mpsc::unbounded_channel();
        update(&mut state, UiEvent::StreamStarted { rx });
        assert!(matches!(state.tui.ask, AskState::Waiting { .. }));

        // The cancelled question's answer arrives late. It must be dropped:
        // the live stream keeps its channel, the new pending bubble stays,
        // and the current thread is not retargeted.
        let stale = serde_json::from_str(
            r#"{"thread_id": "t9", "message": {"content": "stale"}}"#,
        )
        .unwrap();
        let effects = update(
            &mut state,
            UiEvent::AskCompleted {
                seq: old_seq,
                result: Ok(stale),
            },
        );
        assert!(effects.is_empty());
        assert!(matches!(state.tui.ask, AskState::Waiting { .. }));
        assert_eq!(state.tui.chat.bubbles.last(), Some(&Bubble::Pending));
        assert_eq!(state.tui.threads.current.as_deref(), Some("t1"));
    }

    #[test]
    fn test_first_thread_list_load_opens_newest_thread() {
        let mut state = new_state();
        let effects = update(
            &mut state,
            UiEvent::ThreadsLoaded(Ok(vec![summary("t1", "A"), summary("t2", "B")])),
        );
        assert_eq!(
            effects,
            vec![UiEffect::LoadMessages {
                thread_id: "t1".to_string()
            }]
        );
        assert_eq!(state.tui.threads.current.as_deref(), Some("t1"));
    }

    #[test]
    fn test_list_reload_after_delete_does_not_reopen() {
        let mut state = new_state();
        update(
            &mut state,
            UiEvent::ThreadsLoaded(Ok(vec![summary("t1", "A"), summary("t2", "B")])),
        );
        update(
            &mut state,
            UiEvent::ThreadDeleted {
                thread_id: "t1".to_string(),
                result: Ok(()),
            },
        );

        let effects = update(
            &mut state,
            UiEvent::ThreadsLoaded(Ok(vec![summary("t2", "B")])),
        );
        assert!(effects.is_empty());
        assert!(state.tui.threads.current.is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut state = new_state();
        assert_eq!(update(&mut state, ctrl_key('c')), vec![UiEffect::Quit]);
    }
}
