//! Verbatim tree construction.
//!
//! Unlike [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction),
//! which implies `<html>`, `<head>` and `<body>`, auto-closes paragraphs and
//! reparents misnested content, the verbatim builder produces exactly the
//! structure written in the markup. `<tr>` outside a table stays a `<tr>`,
//! and whitespace between tags is kept as text nodes.
//!
//! The only rules:
//! - A start tag opens an element under the current node.
//! - A self-closing tag adds a childless element.
//! - Any end tag closes the current element, whatever its name.
//! - An end tag with no element open ends the fragment.
//! - Comments and DOCTYPEs are dropped.

use htmlmatch_common::warning::{Component, warn_once};
use htmlmatch_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{HTMLTokenizer, Token, TokenizeError, TokenizerOptions};

/// Build a tree from every token `tokenizer` produces.
///
/// The returned tree's Document node holds the fragment's top-level nodes.
/// Elements still open when the input ends stay in the tree with the
/// children they received.
///
/// # Errors
///
/// Returns the tokenizer's error if the stream stops for any reason other
/// than end of input.
pub fn build_verbatim(tokenizer: &mut HTMLTokenizer) -> Result<DomTree, TokenizeError> {
    let mut tree = DomTree::new();
    // The Document is never popped; it is the insertion point for top-level
    // nodes.
    let mut open_elements = vec![NodeId::ROOT];

    loop {
        let token = match tokenizer.next_token() {
            Ok(token) => token,
            Err(err) if err.is_end_of_input() => return Ok(tree),
            Err(err) => return Err(err),
        };
        let current = open_elements.last().copied().unwrap_or(NodeId::ROOT);

        match token {
            Token::StartTag { name, attributes } => {
                let id = tree.alloc(NodeType::Element(ElementData::new(name, attributes)));
                tree.append_child(current, id);
                open_elements.push(id);
            }
            Token::SelfClosingTag { name, attributes } => {
                let id = tree.alloc(NodeType::Element(ElementData::new(name, attributes)));
                tree.append_child(current, id);
            }
            Token::EndTag { name, .. } => {
                if open_elements.len() == 1 {
                    // Nothing left to close: the fragment is complete and
                    // the rest of the input is ignored.
                    warn_once(
                        Component::Builder,
                        &format!("stray </{name}> at top level ends the fragment"),
                    );
                    return Ok(tree);
                }
                let _ = open_elements.pop();
            }
            Token::Text { data } => {
                let id = tree.alloc(NodeType::Text(data));
                tree.append_child(current, id);
            }
            Token::Comment { .. } | Token::Doctype { .. } => {}
        }
    }
}

/// Tokenize `markup` and build its verbatim tree.
///
/// # Errors
///
/// See [`build_verbatim`]. With default options the only stream error is
/// end of input, so this never fails in practice.
pub fn parse_verbatim(markup: &str) -> Result<DomTree, TokenizeError> {
    parse_verbatim_with(markup, TokenizerOptions::default())
}

/// Like [`parse_verbatim`], with explicit tokenizer options.
///
/// # Errors
///
/// Returns [`TokenizeError::BufferExceeded`] if a token is larger than
/// `options.max_buffer`.
pub fn parse_verbatim_with(
    markup: &str,
    options: TokenizerOptions,
) -> Result<DomTree, TokenizeError> {
    let mut tokenizer = HTMLTokenizer::with_options(markup.to_string(), options);
    build_verbatim(&mut tokenizer)
}

/// Build a verbatim tree from raw bytes.
///
/// # Errors
///
/// Returns [`TokenizeError::InvalidUtf8`] if `bytes` is not valid UTF-8, or
/// [`TokenizeError::BufferExceeded`] as for [`parse_verbatim_with`].
pub fn parse_verbatim_bytes(
    bytes: &[u8],
    options: TokenizerOptions,
) -> Result<DomTree, TokenizeError> {
    let mut tokenizer = HTMLTokenizer::from_bytes(bytes, options);
    build_verbatim(&mut tokenizer)
}

/// Like [`parse_verbatim`], for markup known to be well-formed (test
/// patterns, literals).
///
/// # Panics
///
/// Panics if the markup cannot be tokenized.
#[must_use]
pub fn must_parse_verbatim(markup: &str) -> DomTree {
    match parse_verbatim(markup) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse verbatim markup: {err}"),
    }
}
