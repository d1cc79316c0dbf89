//! HTML tokenizer and verbatim tree builder for htmlmatch.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, tag, attribute, comment and DOCTYPE states
//!   - Numeric and common named character references
//!   - Pull-based: tokens are produced one at a time by [`HTMLTokenizer::next_token`]
//!
//! - **Verbatim Builder** ([`verbatim`])
//!   - Builds a [`htmlmatch_dom::DomTree`] that mirrors the token stream
//!     exactly: no implied elements, no auto-closing, no reparenting
//!
//! # Not Implemented
//!
//! - RCDATA, RAWTEXT, script data and CDATA states (`<script>`, `<style>`,
//!   `<title>` contents are tokenized like any other markup)
//! - DOCTYPE public and system identifiers
//! - Tree construction insertion modes

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// Verbatim tree construction from a token stream.
pub mod verbatim;

pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenKind, TokenizeError, TokenizerOptions};
pub use verbatim::{
    build_verbatim, must_parse_verbatim, parse_verbatim, parse_verbatim_bytes,
    parse_verbatim_with,
};
