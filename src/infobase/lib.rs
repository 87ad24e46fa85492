//! # Infobase Architecture
//!
//! Infobase is a **personal information store**: a single JSON file of typed
//! records (articles, links, code snippets, tools...) with ranked free-text
//! search, bulk export/import and statistics. The library knows nothing about
//! terminals; the bundled binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders results, sets up logging       │
//! │  - Decides when to save after a mutation                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, applies configuration         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: validation results, ranking, stats       │
//! │  - Returns `Result<CmdResult>`                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `RecordStore`: the in-memory collection and id policy    │
//! │  - `StorageBackend`: FsBackend (production), MemBackend     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//!
//! Mutations only change the in-memory collection. Nothing reaches disk
//! until [`api::InfobaseApi::save`] (or [`store::RecordStore::save`]) is
//! called, which rewrites the whole file atomically.
//!
//! ## Errors
//!
//! Every operation returns [`error::Result`]. Callers that want a plain
//! pass/fail answer use [`error::Outcome::succeeded`], which logs the
//! failure and returns `false`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation
//! - [`store`]: Record collection and storage backends
//! - [`model`]: `Record`, `ContentType`, input builders, index derivation
//! - [`config`]: `config.json` handling
//! - [`error`]: Error types
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
