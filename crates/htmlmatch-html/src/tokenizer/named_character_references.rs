//! Named character reference lookup.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! The table is the full set of 2,231 entities, as generated by `markup5ever`
//! from the standard's `entities.json`. Besides every real name it also
//! stores each proper prefix of a name mapped to `(0, 0)`, which lets the
//! longest-match search stop as soon as no longer name is possible.

use markup5ever::data::NAMED_ENTITIES;

/// Longest entity name in the table (`CounterClockwiseContourIntegral;`),
/// used to bound lookahead.
pub const MAX_ENTITY_NAME_LEN: usize = 32;

/// Look up a named character reference.
///
/// `name` excludes the leading `&` and includes the semicolon when there is
/// one. Legacy names such as `amp` also resolve without it. Some entities
/// expand to two code points.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Some("&")
/// lookup_entity("amp")   // Some("&")
/// lookup_entity("hel")   // None: only a prefix of a name
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<String> {
    let &(first, second) = NAMED_ENTITIES.get(name)?;
    if first == 0 {
        return None;
    }
    let mut replacement = String::from(char::from_u32(first)?);
    if second != 0 {
        replacement.push(char::from_u32(second)?);
    }
    Some(replacement)
}

/// Find the longest entity name that `candidate` starts with.
///
/// Returns the matched name (including its semicolon, if any) and the
/// replacement text.
#[must_use]
pub fn longest_entity_prefix(candidate: &str) -> Option<(&str, String)> {
    let mut longest = None;
    for len in 1..=candidate.len().min(MAX_ENTITY_NAME_LEN) {
        let Some(name) = candidate.get(..len) else {
            break;
        };
        // Neither a name nor the prefix of one: nothing longer can match.
        if !NAMED_ENTITIES.contains_key(name) {
            break;
        }
        if let Some(replacement) = lookup_entity(name) {
            longest = Some((name, replacement));
        }
    }
    longest
}
