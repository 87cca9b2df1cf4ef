//! # Codedrop Architecture
//!
//! Codedrop stores uploaded files under short four-digit share codes. Anyone
//! holding a code can fetch, inspect or delete the file behind it. Like the
//! rest of this family of tools it is a **library with a CLI client**, not a
//! CLI with some library code: the same core could sit behind an HTTP server
//! or any other front end.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, sets up logging, renders output        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: upload, download, info, list, delete        │
//! │  - Parses raw code strings, returns Result<CmdResult>       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, builds user-facing messages    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry.rs, codes.rs, reconcile.rs)             │
//! │  - Code index, code reservation, startup self-healing       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/, uploads.rs)                               │
//! │  - MappingBackend trait: JSON file (prod), memory (tests)   │
//! │  - UploadDir: the files themselves                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Codes and file names
//!
//! An upload of `report.pdf` that draws code `0421` is stored as
//! `0421.pdf`. The code is both the index key and the file name prefix, which
//! is what lets [`reconcile`] rebuild a lost index from a directory listing.
//! The original base name is not kept; it displays as `file.pdf`.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never calls
//! `std::process::exit`, and reports problems as [`error::CodedropError`].
//! Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`registry`]: Upload/resolve/info/list/delete orchestration
//! - [`codes`]: Share code generation and reservation
//! - [`reconcile`]: Startup reconciliation of index and directory
//! - [`store`]: In-memory index and persistence backends
//! - [`uploads`]: Filesystem access to uploaded files
//! - [`model`]: Codes, display names, size formatting, result types
//! - [`config`]: Configuration management
//! - [`init`]: Resolves the upload directory and wires everything up
//! - [`error`]: Error types

pub mod api;
pub mod codes;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod store;
pub mod uploads;
