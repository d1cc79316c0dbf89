//! Integration tests for the HTML tokenizer.

use htmlmatch_common::warning::{Component, was_warned};
use htmlmatch_html::tokenizer::TokenizerState;
use htmlmatch_html::{Attribute, HTMLTokenizer, Token, TokenKind, TokenizeError, TokenizerOptions};

/// Helper to tokenize a string and return every token before end of input
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input.to_string())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn text(data: &str) -> Token {
    Token::Text {
        data: data.to_string(),
    }
}

#[test]
fn test_plain_text_is_one_token() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![text("Hello")]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::Doctype { name, force_quirks } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert_eq!(
        tokens,
        vec![Token::Doctype {
            name: None,
            force_quirks: true,
        }]
    );
}

#[test]
fn test_start_tag_names_are_lowercased() {
    let tokens = tokenize("<DIV Class=\"X\">");
    assert_eq!(
        tokens,
        vec![Token::StartTag {
            name: "div".to_string(),
            attributes: vec![Attribute::new("class", "X")],
        }]
    );
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind(), TokenKind::EndTag);
    assert_eq!(tokens[0].tag_name(), Some("div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(
        tokens,
        vec![Token::SelfClosingTag {
            name: "br".to_string(),
            attributes: Vec::new(),
        }]
    );
}

#[test]
fn test_self_closing_tag_with_attributes() {
    let tokens = tokenize("<span id=\"mytarget\" />");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind(), TokenKind::SelfClosingTag);
    assert_eq!(tokens[0].attributes(), [Attribute::new("id", "mytarget")]);
}

#[test]
fn test_attribute_value_forms() {
    let tokens = tokenize("<img src=a.png alt title='t' data-x=\"y\">");
    assert_eq!(
        tokens[0].attributes(),
        [
            Attribute::new("src", "a.png"),
            Attribute::new("alt", ""),
            Attribute::new("title", "t"),
            Attribute::new("data-x", "y"),
        ]
    );
}

#[test]
fn test_duplicate_attributes_are_kept() {
    let tokens = tokenize("<a x=\"1\" x=\"2\">");
    assert_eq!(
        tokens[0].attributes(),
        [Attribute::new("x", "1"), Attribute::new("x", "2")]
    );
}

#[test]
fn test_text_between_tags() {
    let tokens = tokenize("<p>hi</p>");
    let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::StartTag, TokenKind::Text, TokenKind::EndTag]
    );
    assert_eq!(tokens[1], text("hi"));
}

#[test]
fn test_whitespace_text_is_kept() {
    let tokens = tokenize("<a> </a>\n");
    assert_eq!(tokens[1], text(" "));
    assert_eq!(tokens[3], text("\n"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(
        tokens,
        vec![Token::Comment {
            data: " hi ".to_string(),
        }]
    );
}

#[test]
fn test_bogus_comments() {
    let tokens = tokenize("<?xml version?></ x>");
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.kind() == TokenKind::Comment));
}

#[test]
fn test_lone_less_than_is_text() {
    assert_eq!(tokenize("x < y"), vec![text("x < y")]);
}

#[test]
fn test_empty_end_tag_is_ignored() {
    assert_eq!(tokenize("a</>b"), vec![text("ab")]);
}

#[test]
fn test_character_references_in_text() {
    assert_eq!(tokenize("a &amp; b &lt;&#65;&#x42;"), vec![text("a & b <AB")]);
}

#[test]
fn test_unknown_reference_is_literal() {
    assert_eq!(tokenize("&bogus; & x"), vec![text("&bogus; & x")]);
}

#[test]
fn test_character_references_in_attributes() {
    let tokens = tokenize("<a href=\"?a=1&amp;b=2&copy=3\" title=x&lt;y>");
    assert_eq!(
        tokens[0].attributes(),
        [
            Attribute::new("href", "?a=1&b=2&copy=3"),
            Attribute::new("title", "x<y"),
        ]
    );
}

#[test]
fn test_newlines_are_normalized() {
    assert_eq!(tokenize("a\r\nb\rc"), vec![text("a\nb\nc")]);
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    assert_eq!(tokenize("x<div class=\"a"), vec![text("x")]);
    assert!(tokenize("<div").is_empty());
}

#[test]
fn test_end_of_input_is_sticky() {
    let mut tokenizer = HTMLTokenizer::new("<p>".to_string());
    assert!(tokenizer.next_token().is_ok());
    assert_eq!(tokenizer.next_token(), Err(TokenizeError::EndOfInput));
    assert_eq!(tokenizer.next_token(), Err(TokenizeError::EndOfInput));
}

#[test]
fn test_invalid_utf8_after_valid_prefix() {
    let mut tokenizer = HTMLTokenizer::from_bytes(b"<p>ok\xff</p>", TokenizerOptions::default());
    assert_eq!(tokenizer.next_token().map(|t| t.kind()), Ok(TokenKind::StartTag));
    assert_eq!(tokenizer.next_token(), Ok(text("ok")));
    assert_eq!(
        tokenizer.next_token(),
        Err(TokenizeError::InvalidUtf8 { valid_up_to: 5 })
    );
    assert_eq!(
        tokenizer.next_token(),
        Err(TokenizeError::InvalidUtf8 { valid_up_to: 5 })
    );
}

#[test]
fn test_iterator_yields_terminal_error_once() {
    let tokenizer = HTMLTokenizer::from_bytes(b"a\xff", TokenizerOptions::default());
    let items: Vec<_> = tokenizer.collect();
    assert_eq!(
        items,
        vec![Ok(text("a")), Err(TokenizeError::InvalidUtf8 { valid_up_to: 1 })]
    );
}

#[test]
fn test_buffer_limit_exceeded() {
    let options = TokenizerOptions {
        max_buffer: Some(8),
    };
    let mut tokenizer =
        HTMLTokenizer::with_options("<div class=\"very-long-value\">".to_string(), options);
    assert_eq!(
        tokenizer.next_token(),
        Err(TokenizeError::BufferExceeded { start: 0, limit: 8 })
    );
}

#[test]
fn test_buffer_limit_not_reached() {
    let options = TokenizerOptions {
        max_buffer: Some(8),
    };
    let tokenizer = HTMLTokenizer::with_options("<p>hi</p><p>yo</p>".to_string(), options);
    let tokens: Result<Vec<_>, _> = tokenizer.collect();
    assert_eq!(tokens.map(|t| t.len()), Ok(6));
}

#[test]
fn test_token_display() {
    let tokens = tokenize("<a href=\"x\"><br/></a><!--c-->t\n");
    let shown: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        shown,
        vec![
            "<a href=\"x\">",
            "<br />",
            "</a>",
            "<!--c-->",
            "Text(\"t\\n\")",
        ]
    );
}

#[test]
fn test_state_returns_to_data_after_a_tag() {
    let mut tokenizer = HTMLTokenizer::new("<p class=x>text".to_string());
    assert_eq!(tokenizer.state(), TokenizerState::Data);
    assert_eq!(tokenizer.next_token().map(|t| t.kind()), Ok(TokenKind::StartTag));
    assert_eq!(tokenizer.state(), TokenizerState::Data);
}

#[test]
fn test_repeated_parse_errors_share_one_warning() {
    let markup = "<p>a &amp b</p>".repeat(5);
    let tokens = tokenize(&markup);
    assert_eq!(tokens.len(), 15);
    assert!(tokens.contains(&text("a & b")));

    let code = "missing-semicolon-after-character-reference";
    assert!(was_warned(
        Component::Tokenizer,
        &format!("{code} parse error in Data state")
    ));
    // The offset is not part of the message, so no per-position entries exist.
    for offset in [9, 24, 39] {
        assert!(!was_warned(
            Component::Tokenizer,
            &format!("{code} parse error in Data state at byte {offset}")
        ));
    }
}

#[test]
fn test_only_end_of_input_is_the_normal_terminator() {
    let mut tokenizer = HTMLTokenizer::new("x".to_string());
    assert_eq!(tokenizer.next_token(), Ok(text("x")));
    assert!(tokenizer.next_token().is_err_and(|err| err.is_end_of_input()));
    assert!(!TokenizeError::InvalidUtf8 { valid_up_to: 0 }.is_end_of_input());
    assert!(!TokenizeError::BufferExceeded { start: 0, limit: 1 }.is_end_of_input());
}
