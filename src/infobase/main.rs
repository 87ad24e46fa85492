//! # Infobase CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns the
//! user-facing concerns: argument parsing, locating the data directory,
//! logger setup, saving after mutations, and rendering `CmdResult` values
//! as colored text or JSON.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
