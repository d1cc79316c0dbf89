//! Ordered, attribute-aware subtree containment for HTML trees.
//!
//! [`contains_tree`] decides whether a small *pattern* tree occurs inside a
//! larger *full* tree: every pattern node must be found in the full tree in
//! the same document order and with the same nesting, but the full tree may
//! have any number of extra nodes in between and extra attributes on the
//! nodes that match.
//!
//! # Example
//!
//! ```
//! use htmlmatch::contains_tree;
//! use htmlmatch_html::must_parse_verbatim;
//!
//! let full = must_parse_verbatim(
//!     r##"<div hx-get="/foo" hx-target="#out">Click</div><p><span id="out">x</span></p>"##,
//! );
//! let pattern = must_parse_verbatim(
//!     r##"<div hx-target="#out"></div>
//!        <span id="out"/>"##,
//! );
//! assert!(contains_tree(full.top_level(), pattern.top_level()));
//! ```
//!
//! # Text
//!
//! Pattern text is compared after trimming both sides, so formatting
//! whitespace in a pattern never causes a mismatch. Two prefixes change that:
//!
//! - `substring:` matches full text containing the rest of the pattern text.
//! - `verbatim:` matches full text exactly equal to the rest, whitespace
//!   included.
//!
//! # Matching is greedy
//!
//! Once a pattern node has matched a full node, the match is never undone.
//! A later pattern sibling that cannot be placed makes the whole match fail
//! even if an earlier pattern node could have matched somewhere else.

use htmlmatch_dom::{NodeRef, NodeType};
use strum_macros::Display;

/// Pattern text prefix selecting [`TextMode::Substring`].
pub const SUBSTRING_PREFIX: &str = "substring:";

/// Pattern text prefix selecting [`TextMode::Verbatim`].
pub const VERBATIM_PREFIX: &str = "verbatim:";

/// How a pattern text node is compared with a full text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TextMode {
    /// Equal after trimming leading and trailing whitespace on both sides.
    Trimmed,
    /// The full text contains the needle. Nothing is trimmed.
    Substring,
    /// The full text equals the needle exactly.
    Verbatim,
}

impl TextMode {
    /// Split pattern text into its mode and the text to compare against.
    ///
    /// `substring:` is checked before `verbatim:`; the prefix is removed from
    /// the returned needle. Text with neither prefix is returned unchanged.
    #[must_use]
    pub fn split(pattern: &str) -> (Self, &str) {
        if let Some(needle) = pattern.strip_prefix(SUBSTRING_PREFIX) {
            (Self::Substring, needle)
        } else if let Some(needle) = pattern.strip_prefix(VERBATIM_PREFIX) {
            (Self::Verbatim, needle)
        } else {
            (Self::Trimmed, pattern)
        }
    }

    /// Compare `full` text with the `needle` produced by [`TextMode::split`].
    #[must_use]
    pub fn matches(self, full: &str, needle: &str) -> bool {
        match self {
            Self::Trimmed => full.trim() == needle.trim(),
            Self::Substring => full.contains(needle),
            Self::Verbatim => full == needle,
        }
    }
}

/// Whether `full` matches `pattern`, ignoring their children.
///
/// - The node kinds must be equal.
/// - Text is compared by the pattern's [`TextMode`]; every other node
///   compares its data (the tag name for elements) trimmed.
/// - Every attribute of `pattern` must appear on `full` with the same name
///   and value. Order does not matter and `full` may have more.
#[must_use]
pub fn element_matches(full: NodeRef<'_>, pattern: NodeRef<'_>) -> bool {
    if full.kind() != pattern.kind() {
        return false;
    }

    let data_matches = match pattern.node_type() {
        NodeType::Text(text) => {
            let (mode, needle) = TextMode::split(text);
            mode.matches(full.data(), needle)
        }
        _ => TextMode::Trimmed.matches(full.data(), pattern.data()),
    };

    data_matches
        && pattern
            .attributes()
            .iter()
            .all(|wanted| full.attributes().contains(wanted))
}

/// Whether the pattern sibling chain starting at `pattern` is contained in
/// the full sibling chain starting at `full`.
///
/// A `None` pattern is contained in everything. A `None` full contains only
/// the empty pattern (or one made of whitespace text alone).
#[must_use]
pub fn contains_tree(full: Option<NodeRef<'_>>, pattern: Option<NodeRef<'_>>) -> bool {
    advance(full, pattern).is_none()
}

/// Match as much of the pattern chain as possible against the full chain,
/// returning the first pattern node left unmatched.
///
/// Each full node is visited once. A pattern node is consumed when it
/// matches a full node and its whole child chain is consumed by that node's
/// children; otherwise the search for it continues inside the full node's
/// children, then along its siblings.
fn advance<'p>(mut full: Option<NodeRef<'_>>, pattern: Option<NodeRef<'p>>) -> Option<NodeRef<'p>> {
    let mut pattern = skip_whitespace(pattern);
    while let (Some(f), Some(p)) = (full, pattern) {
        pattern = if element_matches(f, p) && advance(f.first_child(), p.first_child()).is_none() {
            skip_whitespace(p.next_sibling())
        } else {
            advance(f.first_child(), Some(p))
        };
        full = f.next_sibling();
    }
    pattern
}

/// Skip whitespace-only text nodes at the head of a pattern chain.
fn skip_whitespace(mut node: Option<NodeRef<'_>>) -> Option<NodeRef<'_>> {
    while let Some(n) = node
        && matches!(n.node_type(), NodeType::Text(text) if text.trim().is_empty())
    {
        node = n.next_sibling();
    }
    node
}
