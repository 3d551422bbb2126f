//! # Slate
//!
//! A production-tracking server for VFX pipelines, usable both as a
//! standalone binary and as a library.
//!
//! Slate tracks the entity hierarchy Project → (Asset | Shot) → Task →
//! Version → Publish, plus render jobs and audit events, over an HTTP/JSON
//! API backed by SQLite.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! slate = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use slate::server::{AppState, create_router};
//! use slate::server::ratelimit::SlidingWindow;
//! use slate::store::SqliteStore;
//!
//! let store = SqliteStore::new("./data/slate.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     Arc::new(SlidingWindow::new(100, Duration::from_secs(60))),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI entry point. Disable with
//!   `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
pub mod uid;
