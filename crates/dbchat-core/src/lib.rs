//! Shared configuration and logging for the dbchat client.

pub mod config;
pub mod logging;
