//! The small verbs the tokenizer states are written in.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! Each helper is named after the phrase the HTML standard uses for it, so a
//! state handler reads close to the algorithm text.

use htmlmatch_common::warning::{Component, warn_once};

use super::core::{HTMLTokenizer, TokenizerState};
use super::error::TokenizeError;
use super::token::Token;

// =============================================================================
// States
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state". The next step sees the current character
    /// again instead of reading a new one.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"; `None` at end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// The character `offset` places past the read position, left unread.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// Whether the unread input starts with `target`.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Like [`Self::next_few_characters_are`], ignoring ASCII case, as the
    /// `DOCTYPE` keyword is matched.
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Step over `target`, which the caller has already matched.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "U+0009 TAB, U+000A LF, U+000C FF, or U+0020 SPACE" (CR is normalized
    /// away before tokenization).
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }

    /// "U+0000 NULL - This is an unexpected-null-character parse error.
    /// Append a U+FFFD REPLACEMENT CHARACTER character"
    pub(super) fn replace_null(&self, c: char) -> char {
        if c == '\0' {
            self.log_parse_error("unexpected-null-character");
            '\u{FFFD}'
        } else {
            c
        }
    }
}

// =============================================================================
// Current Token Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Apply `f` to the token under construction, if there is one.
    pub(super) fn with_current_token(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        let mut buf = [0; 4];
        let s = c.encode_utf8(&mut buf);
        self.with_current_token(|token| token.append_to_current_attribute_value(s));
    }

    /// "Append the current input character to the comment token's data."
    pub(super) fn append_to_comment(&mut self, c: char) {
        let mut buf = [0; 4];
        let s = c.encode_utf8(&mut buf);
        self.with_current_token(|token| token.append_to_comment(s));
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token" - queues any pending text, then the token.
    pub(super) fn emit_token(&mut self) {
        self.flush_text();
        if let Some(token) = self.current_token.take() {
            self.pending.push_back(token);
        }
        self.token_start = self.current_pos;
    }

    /// "Emit the current input character as a character token."
    ///
    /// Character tokens are buffered and leave the tokenizer as one
    /// [`Token::Text`] when the next non-character token is emitted.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.text_buffer.push(c);
    }

    /// Emit a character token for each character of `s`.
    pub(super) fn emit_characters(&mut self, s: &str) {
        self.text_buffer.push_str(s);
    }

    /// "Emit an end-of-file token."
    ///
    /// Ends the stream: pending text is queued, and every later request
    /// returns end-of-input (or the input error, for truncated byte input).
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text();
        self.current_token = None;
        self.error = Some(
            self.input_error
                .take()
                .unwrap_or(TokenizeError::EndOfInput),
        );
    }

    fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let data = std::mem::take(&mut self.text_buffer);
            self.pending.push_back(Token::Text { data });
            self.token_start = self.current_pos;
        }
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    pub(super) fn eof_in_tag(&mut self) {
        self.log_parse_error("eof-in-tag");
        self.current_token = None;
        self.emit_eof_token();
    }

    /// "EOF - This is an eof-in-comment parse error. Emit the comment token.
    /// Emit an end-of-file token."
    pub(super) fn eof_in_comment(&mut self) {
        self.log_parse_error("eof-in-comment");
        self.emit_token();
        self.emit_eof_token();
    }

    /// "EOF - This is an eof-in-doctype parse error. [...] Set the current
    /// DOCTYPE token's force-quirks flag to on. Emit the current DOCTYPE
    /// token. Emit an end-of-file token."
    pub(super) fn eof_in_doctype(&mut self) {
        self.log_parse_error("eof-in-doctype");
        let mut token = self.current_token.take().unwrap_or_else(Token::new_doctype);
        token.set_force_quirks();
        self.current_token = Some(token);
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors in HTML are not fatal - the tokenizer recovers and
    /// continues. They are reported through the warning system, once per
    /// error code and state; the byte offset is left out so repeats collapse.
    pub(super) fn log_parse_error(&self, code: &str) {
        let state = self.state;
        warn_once(
            Component::Tokenizer,
            &format!("{code} parse error in {state} state"),
        );
    }
}
