//! HTTP server for memo.
//!
//! Serves the word and note collections as a small JSON API under `/api`,
//! and static files (the front page) for everything else.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, TlsConfig};
pub use error::{ServerError, ServerResult};
pub use server::{shutdown_signal, MemoServer};
pub use state::AppState;
