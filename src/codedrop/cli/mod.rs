//! # CLI Behavior
//!
//! This is **one possible UI client** for codedrop, not the application
//! itself. The CLI is the only place that knows about terminal I/O, exit codes
//! and output formatting.
//!
//! ### Naked Execution (`codedrop`)
//!
//! Running `codedrop` with no arguments lists the stored files.
//!
//! ### Uploading
//!
//! `codedrop upload report.pdf` stores the file and prints its share code.
//! `--name` overrides the name the upload is recorded under, which matters
//! for the stored extension. A path of `-` reads the content from stdin and
//! then requires `--name`.
//!
//! ### Where files live
//!
//! `--dir` wins, then `CODEDROP_HOME`, then the platform data directory.
//! Logging goes to stderr and is tuned with `CODEDROP_LOG`.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print results
//! - `render`: Output formatting (listing, info block, messages)
//! - `setup`: Argument parsing via clap, logging setup

mod commands;
mod render;
pub mod setup;

pub use commands::run;
