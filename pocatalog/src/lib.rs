#![forbid(unsafe_code)]
//! Gettext PO catalog parser for Rust.
//!
//! Parses `.po` translation catalogs into a structured [`Catalog`] model:
//! blank-line-delimited blocks, a per-block entry state machine, and a
//! batch scheduler that can fan blocks out over parallel workers with
//! cooperative cancellation. Malformed input produces line-numbered
//! diagnostics, either failing fast or collected while parsing continues.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pocatalog::{ParseOptions, parser};
//!
//! // Load a catalog file (charset is sniffed from its header)
//! let catalog = parser::load("de/messages.po", &ParseOptions::default())?;
//!
//! // Or parse in parallel, collecting diagnostics instead of failing fast
//! let options = ParseOptions::new()
//!     .with_parallel(true)
//!     .with_abort_on_invalid(false);
//! let content = std::fs::read_to_string("de/messages.po")?;
//! let catalog = parser::parse_str(&content, &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - 📖 Full PO entry grammar: contexts, plurals, obsolete entries,
//!   multi-line strings, and every comment kind
//! - ⚡ Optional parallel block parsing with a shared abort signal
//! - 🔍 Precise diagnostics carrying line numbers and offending text
//! - 🦀 Idiomatic, modular, and ergonomic Rust API

pub mod error;
pub mod options;
pub mod parser;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::{Diagnostic, Error},
    options::ParseOptions,
    parser::{load, parse_bytes, parse_str, parse_str_into},
    types::{Catalog, Location, Message, Metadata, Plural, Translation},
};
