//! Common utilities for the htmlmatch crates.
//!
//! This crate provides shared infrastructure used by the tokenizer, the
//! verbatim builder and the command-line tool:
//! - **Warning System** - colored, deduplicated stderr diagnostics

pub mod warning;

pub use warning::{Component, clear_warnings, warn_once, was_warned};
