//! Character reference decoding for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The character reference states are collapsed into a single lookahead
//! routine: called right after an `&` has been consumed, it either consumes a
//! complete reference and returns its replacement, or consumes nothing and
//! leaves the `&` to be treated as a literal.

use super::core::HTMLTokenizer;
use super::named_character_references::{MAX_ENTITY_NAME_LEN, longest_entity_prefix};

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "ASCII alphanumeric - Reconsume in the named character reference state."
    /// "U+0023 NUMBER SIGN (#) - Append the current input character to the
    /// temporary buffer. Switch to the numeric character reference state."
    /// "Anything else - Flush code points consumed as a character reference."
    pub(super) fn consume_character_reference(&mut self, in_attribute: bool) -> Option<String> {
        match self.peek_codepoint(0)? {
            '#' => self.consume_numeric_character_reference(),
            c if c.is_ascii_alphanumeric() => self.consume_named_character_reference(in_attribute),
            _ => None,
        }
    }

    /// Handle `&` inside an attribute value: append the decoded reference, or
    /// a literal ampersand when there is none.
    pub(super) fn append_attribute_character_reference(&mut self) {
        match self.consume_character_reference(true) {
            Some(decoded) => {
                self.with_current_token(|token| token.append_to_current_attribute_value(&decoded));
            }
            None => self.append_to_attribute_value('&'),
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the named character references
    /// table."
    fn consume_named_character_reference(&mut self, in_attribute: bool) -> Option<String> {
        let candidate: String = self.input[self.current_pos..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == ';')
            .take(MAX_ENTITY_NAME_LEN)
            .collect();
        let (name, replacement) = longest_entity_prefix(&candidate)?;

        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical
        // reasons, flush code points consumed as a character reference and
        // switch to the return state."
        if !name.ends_with(';') {
            let next = self.input[self.current_pos + name.len()..].chars().next();
            if in_attribute && next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                return None;
            }
            // "This is a missing-semicolon-after-character-reference parse error."
            self.log_parse_error("missing-semicolon-after-character-reference");
        }

        self.current_pos += name.len();
        Some(replacement)
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    ///
    /// Consumes `#`, an optional `x`/`X`, the digits and an optional `;`.
    /// Without any digits nothing is consumed: "This is an
    /// absence-of-digits-in-numeric-character-reference parse error."
    fn consume_numeric_character_reference(&mut self) -> Option<String> {
        let rest = &self.input[self.current_pos + 1..];
        let (radix, prefix_len) = match rest.chars().next() {
            Some('x' | 'X') => (16, 2),
            _ => (10, 1),
        };
        let digits: &str = {
            let body = &self.input[self.current_pos + prefix_len..];
            let end = body
                .find(|c: char| !c.is_digit(radix))
                .unwrap_or(body.len());
            &body[..end]
        };
        if digits.is_empty() {
            self.log_parse_error("absence-of-digits-in-numeric-character-reference");
            return None;
        }

        // Saturate: anything beyond U+10FFFF is replaced below anyway.
        let code = digits.chars().fold(0u32, |acc, c| {
            acc.saturating_mul(radix)
                .saturating_add(c.to_digit(radix).unwrap_or(0))
        });
        let mut consumed = prefix_len + digits.len();
        if self.input[self.current_pos + consumed..].starts_with(';') {
            consumed += 1;
        } else {
            self.log_parse_error("missing-semicolon-after-character-reference");
        }
        self.current_pos += consumed;

        Some(self.numeric_reference_replacement(code).to_string())
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    fn numeric_reference_replacement(&self, code: u32) -> char {
        // "If the number is 0x00, then this is a null-character-reference parse
        // error. Set the character reference code to 0xFFFD."
        // "If the number is greater than 0x10FFFF [...] or a surrogate [...]
        // set the character reference code to 0xFFFD."
        match code {
            0 => {
                self.log_parse_error("null-character-reference");
                '\u{FFFD}'
            }
            code => char::from_u32(code).unwrap_or_else(|| {
                self.log_parse_error("character-reference-outside-unicode-range");
                '\u{FFFD}'
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str, in_attribute: bool) -> (Option<String>, usize) {
        let mut tokenizer = HTMLTokenizer::new(input.to_string());
        let decoded = tokenizer.consume_character_reference(in_attribute);
        (decoded, tokenizer.current_pos)
    }

    #[test]
    fn decodes_named_reference_with_semicolon() {
        assert_eq!(decode("amp;rest", false), (Some("&".to_string()), 4));
        assert_eq!(decode("hellip;", false), (Some("\u{2026}".to_string()), 7));
    }

    #[test]
    fn decodes_entities_from_the_full_table() {
        assert_eq!(decode("hearts;", false), (Some("\u{2665}".to_string()), 7));
        assert_eq!(decode("lambda;", false), (Some("\u{03BB}".to_string()), 7));
        assert_eq!(
            decode("NotEqualTilde;", false),
            (Some("\u{2242}\u{0338}".to_string()), 14)
        );
        assert_eq!(
            decode("CounterClockwiseContourIntegral;", false),
            (Some("\u{2233}".to_string()), 32)
        );
    }

    #[test]
    fn falls_back_to_longest_legacy_name() {
        // "notit;" is not an entity, but its prefix "not" is.
        assert_eq!(decode("notit;", false), (Some("\u{00AC}".to_string()), 3));
        assert_eq!(decode("notin;", false), (Some("\u{2209}".to_string()), 6));
    }

    #[test]
    fn decodes_legacy_reference_in_text() {
        assert_eq!(decode("ampx", false), (Some("&".to_string()), 3));
    }

    #[test]
    fn legacy_reference_in_attribute_followed_by_alnum_is_literal() {
        assert_eq!(decode("ampx", true), (None, 0));
        assert_eq!(decode("amp=", true), (None, 0));
        assert_eq!(decode("amp ", true), (Some("&".to_string()), 3));
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode("#65;", false), (Some("A".to_string()), 4));
        assert_eq!(decode("#x41;", false), (Some("A".to_string()), 5));
        assert_eq!(decode("#X263A", false), (Some("\u{263A}".to_string()), 6));
        assert_eq!(decode("#0;", false), (Some("\u{FFFD}".to_string()), 3));
        assert_eq!(decode("#xD800;", false), (Some("\u{FFFD}".to_string()), 7));
        assert_eq!(
            decode("#99999999999;", false),
            (Some("\u{FFFD}".to_string()), 13)
        );
    }

    #[test]
    fn rejects_references_without_digits_or_name() {
        assert_eq!(decode("#;", false), (None, 0));
        assert_eq!(decode("#x;", false), (None, 0));
        assert_eq!(decode(" x", false), (None, 0));
        assert_eq!(decode("unknown;", false), (None, 0));
        assert_eq!(decode("", false), (None, 0));
    }
}
