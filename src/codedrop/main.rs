//! # Codedrop CLI
//!
//! The binary is intentionally thin: argument parsing, rendering and process
//! termination live in `src/codedrop/cli/`, while this file only invokes
//! `cli::run()` and turns an error into an exit code.
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI is therefore
//! responsible for **all** user-facing concerns: argument parsing, logging
//! setup, context initialization, dispatch, error reporting and output.
//!
//! ## Testing Approach
//!
//! - **Command layer (`commands/`)**: unit tests of the business logic against
//!   temporary directories and the in-memory backend.
//! - **API layer (`api.rs`)**: dispatch and code parsing.
//! - **CLI layer**: end-to-end runs of the binary in `tests/`, isolated with
//!   `CODEDROP_HOME`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
