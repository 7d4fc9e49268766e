//! # Deckz Architecture
//!
//! Deckz is a **UI-agnostic deck and card organizer library**. Decks hold
//! ordered cards (title, category, notes, hashtags, images). A read-only
//! baseline dataset ships with the app; the user's edits live in a local
//! overlay that is layered on top of it at startup.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the live collection and the overlay store           │
//! │  - Tracks whether the last write reached storage            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic over Collection + OverlayStore       │
//! │  - Persists the full snapshot after every mutation          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/) and Loader (loader.rs)              │
//! │  - Abstract OverlayStore trait                              │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! │  - Baseline + overlay merge at startup                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! `Result<CmdResult>`, and never writes to stdout/stderr. Diagnostics go
//! through `tracing`; the binary decides where they end up.
//!
//! ## Errors
//!
//! Validation and not-found errors are returned before anything changes.
//! Load failures are absorbed by the loader. A failed overlay write does not
//! undo the change; it is reported on the `CmdResult` and the API stays
//! "unsaved" until a later write succeeds.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`loader`]: Baseline and overlay loading and merging
//! - [`store`]: Overlay storage abstraction and implementations
//! - [`model`]: Core data types (`Deck`, `Card`, `Snapshot`)
//! - [`normalize`]: Hashtag and image-list normalization
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod store;
