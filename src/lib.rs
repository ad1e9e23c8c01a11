//! Study flashcards kept in a Notion database.
//!
//! - [`server`]: HTTP proxy between a client and the Notion API
//! - [`client`]: credential store, backend client and the study session
//! - [`gui`]: egui desktop front end for the session
//! - [`notion`]: Notion requests and page/card mapping
pub mod client;
pub mod core;
pub mod gui;
pub mod notion;
pub mod persistence;
pub mod server;

use tracing_subscriber::{
    fmt,
    EnvFilter,
};

/// `RUST_LOG` wins; otherwise everything at `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
