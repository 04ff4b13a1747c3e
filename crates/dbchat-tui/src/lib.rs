//! Full-screen TUI for the dbchat client.

pub mod chat;
pub mod effects;
pub mod events;
pub mod input;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod threads;
pub mod update;
pub mod writer;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use runtime::TuiRuntime;

use dbchat_core::config::Config;

/// Runs the interactive chat loop.
pub async fn run_chat(config: Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!("dbchat is interactive and requires a terminal.");
    }

    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()
}
