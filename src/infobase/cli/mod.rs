//! # CLI Behavior
//!
//! One possible UI client for infobase. It is the only place that knows about
//! terminal I/O, exit codes and output formatting.
//!
//! ### Data directory
//!
//! Resolved in order: `--home <dir>`, the `INFOBASE_HOME` environment
//! variable, then the platform data directory. `config.json` and, unless
//! configured otherwise, `information_database.json` live there. `--file`
//! points a single invocation at another data file.
//!
//! ### Saving
//!
//! Mutating commands (`add`, `update`, `delete`, `import`) save once after
//! the operation succeeds. A failed operation leaves the file untouched.
//!
//! ### Output
//!
//! Human readable by default; `--json` prints records, search hits and
//! statistics as pretty JSON instead. Messages always go to stdout, logs to
//! stderr (`--verbose` or `RUST_LOG`).
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `render`: Output formatting (record lists, full records, stats)
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
