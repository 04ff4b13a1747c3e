//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Async results arrive through a single "inbox" channel:
//! - handlers send `UiEvent`s to `inbox_tx` when their backend call finishes
//! - the runtime drains `inbox_rx` each frame to collect results
//!
//! The active answer stream is the one exception: its chunks arrive on a
//! dedicated channel held inside `AskState`, so a cancelled stream can be
//! torn down by dropping the receiver.

mod handlers;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use dbchat_api::ApiClient;
use dbchat_core::config::Config;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, AskState};
use crate::{render, terminal, update};

/// Poll duration when idle. Longer timeout reduces CPU usage when nothing
/// is happening.
const IDLE_POLL_DURATION: Duration = Duration::from_millis(150);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the state, and the API client. Runs the event loop
/// and executes effects. Terminal state is restored on drop and panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: Arc<ApiClient>,
    /// Inbox sender - handlers send events here.
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Last time a Tick event was emitted.
    last_tick: Instant,
}

impl TuiRuntime {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config)?);

        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(config);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            client,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        // Populate the sidebar before the first frame is drawn.
        self.execute_effect(UiEffect::LoadThreads);

        let mut dirty = true;
        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Only Tick triggers a render; other events update state
                // and batch their redraw to the next tick.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from all sources (stream, inbox, terminal, tick).
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // The writer drain needs the configured tick cadence; when idle a
        // slower tick is enough for the spinner and feels identical.
        let tick_interval = if self.state.tui.ask.is_busy() {
            Duration::from_millis(self.state.tui.config.tick_ms)
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_stream_events(&mut events);

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block on terminal input until the next tick is due, unless events
        // are already pending.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Drains chunks from the active stream channel, if any.
    fn collect_stream_events(&mut self, events: &mut Vec<UiEvent>) {
        while let AskState::Waiting { rx } | AskState::Streaming { rx, .. } =
            &mut self.state.tui.ask
        {
            match rx.try_recv() {
                Ok(ev) => events.push(UiEvent::Stream(ev)),
                Err(_) => break,
            }
        }
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect; its resulting event lands in the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let _ = tx.send(f(client).await);
        });
    }

    /// Executes a single effect.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            UiEffect::LoadThreads => {
                self.spawn_effect(handlers::load_threads);
            }
            UiEffect::LoadMessages { thread_id } => {
                self.spawn_effect(move |client| handlers::load_messages(client, thread_id));
            }
            UiEffect::CreateThread => {
                self.spawn_effect(handlers::create_thread);
            }
            UiEffect::RenameThread { thread_id, title } => {
                self.spawn_effect(move |client| handlers::rename_thread(client, thread_id, title));
            }
            UiEffect::DeleteThread { thread_id } => {
                self.spawn_effect(move |client| handlers::delete_thread(client, thread_id));
            }

            UiEffect::Ask {
                seq,
                thread_id,
                question,
            } => {
                self.spawn_effect(move |client| handlers::ask(client, seq, thread_id, question));
            }

            UiEffect::StartStream { question } => {
                // The chunk channel goes straight into AskState via the
                // reducer; the stream task keeps the sender.
                let (tx, rx) = mpsc::unbounded_channel();
                let effects = update::update(&mut self.state, UiEvent::StreamStarted { rx });
                self.execute_effects(effects);

                let client = Arc::clone(&self.client);
                tokio::spawn(async move {
                    handlers::run_stream(client, question, tx).await;
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
