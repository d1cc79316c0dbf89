//! Integration tests for the verbatim tree builder.

use htmlmatch_dom::{Attribute, DomTree, NodeKind, NodeRef};
use htmlmatch_html::{
    TokenizeError, TokenizerOptions, must_parse_verbatim, parse_verbatim, parse_verbatim_bytes,
    parse_verbatim_with,
};

/// Helper to render a subtree compactly: `tag[children]` or `"text"`
fn shape(node: NodeRef<'_>) -> String {
    match node.kind() {
        NodeKind::Text => format!("{:?}", node.data()),
        _ => {
            let children: Vec<String> = node.children().map(shape).collect();
            if children.is_empty() {
                node.data().to_string()
            } else {
                format!("{}[{}]", node.data(), children.join(","))
            }
        }
    }
}

fn top_level_shapes(tree: &DomTree) -> Vec<String> {
    tree.document().children().map(shape).collect()
}

/// Every parent/child/sibling link must agree with its counterpart.
fn assert_links_consistent(node: NodeRef<'_>) {
    let children: Vec<NodeRef<'_>> = node.children().collect();
    assert_eq!(node.first_child(), children.first().copied());
    assert_eq!(node.last_child(), children.last().copied());
    for pair in children.windows(2) {
        assert_eq!(pair[0].next_sibling(), Some(pair[1]));
        assert_eq!(pair[1].prev_sibling(), Some(pair[0]));
    }
    for child in children {
        assert_eq!(child.parent(), Some(node));
        assert_links_consistent(child);
    }
}

#[test]
fn test_nested_elements() {
    let tree = must_parse_verbatim("<div><p>a</p><p>b</p></div>");
    assert_eq!(top_level_shapes(&tree), vec![r#"div[p["a"],p["b"]]"#]);
    assert_links_consistent(tree.document());
}

#[test]
fn test_no_implied_elements() {
    let tree = must_parse_verbatim("<td>a1</td>");
    let td = tree.top_level().unwrap();
    assert_eq!(td.data(), "td");
    assert_eq!(td.parent(), Some(tree.document()));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_mismatched_end_tag_closes_nearest_element() {
    let tree = must_parse_verbatim("<div><span>x</div>y</span>");
    assert_eq!(top_level_shapes(&tree), vec![r#"div[span["x"],"y"]"#]);
}

#[test]
fn test_stray_end_tag_at_top_level_ends_fragment() {
    let tree = must_parse_verbatim("<p>a</p></x><p>b</p>");
    assert_eq!(top_level_shapes(&tree), vec![r#"p["a"]"#]);
}

#[test]
fn test_comments_and_doctypes_are_dropped() {
    let tree = must_parse_verbatim("<!DOCTYPE html><!-- c --><p><!-- d -->x</p>");
    assert_eq!(top_level_shapes(&tree), vec![r#"p["x"]"#]);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_unclosed_elements_are_kept_at_end_of_input() {
    let tree = must_parse_verbatim("<ul><li>one<li>two");
    assert_eq!(top_level_shapes(&tree), vec![r#"ul[li["one",li["two"]]]"#]);
    assert_links_consistent(tree.document());
}

#[test]
fn test_whitespace_text_is_preserved() {
    let tree = must_parse_verbatim("<a> <b></b>\n</a>");
    assert_eq!(top_level_shapes(&tree), vec![r#"a[" ",b,"\n"]"#]);
}

#[test]
fn test_self_closing_tag_is_a_leaf() {
    let tree = must_parse_verbatim("<br/>text<hr />");
    assert_eq!(top_level_shapes(&tree), vec!["br", r#""text""#, "hr"]);
    let br = tree.top_level().unwrap();
    assert!(br.first_child().is_none());
}

#[test]
fn test_multiple_top_level_siblings() {
    let tree = must_parse_verbatim("<a></a><b></b>");
    let first = tree.top_level().unwrap();
    let second = first.next_sibling().unwrap();
    assert_eq!(second.data(), "b");
    assert_eq!(second.prev_sibling(), Some(first));
    assert!(second.next_sibling().is_none());
}

#[test]
fn test_attributes_keep_order_and_duplicates() {
    let tree = must_parse_verbatim("<x b=\"2\" a=\"1\" b=\"3\"/>");
    let x = tree.top_level().unwrap();
    assert_eq!(
        x.attributes(),
        [
            Attribute::new("b", "2"),
            Attribute::new("a", "1"),
            Attribute::new("b", "3"),
        ]
    );
}

#[test]
fn test_character_references_are_decoded() {
    let tree = must_parse_verbatim("<a title=\"x &amp; y\">&lt;b&gt;</a>");
    let a = tree.top_level().unwrap();
    assert_eq!(a.attributes(), [Attribute::new("title", "x & y")]);
    assert_eq!(a.first_child().unwrap().data(), "<b>");
}

#[test]
fn test_empty_input() {
    let tree = parse_verbatim("").unwrap();
    assert!(tree.top_level().is_none());
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_invalid_utf8_is_propagated() {
    let result = parse_verbatim_bytes(b"<p>\xff</p>", TokenizerOptions::default());
    assert!(matches!(
        result,
        Err(TokenizeError::InvalidUtf8 { valid_up_to: 3 })
    ));
}

#[test]
fn test_valid_bytes_parse() {
    let tree = parse_verbatim_bytes("<p>caf\u{e9}</p>".as_bytes(), TokenizerOptions::default())
        .unwrap();
    assert_eq!(top_level_shapes(&tree), vec!["p[\"caf\u{e9}\"]"]);
}

#[test]
fn test_buffer_limit_is_propagated() {
    let options = TokenizerOptions {
        max_buffer: Some(16),
    };
    let result = parse_verbatim_with("<p>ok</p><div data-long=\"0123456789abcdef\">", options);
    assert!(matches!(
        result,
        Err(TokenizeError::BufferExceeded { limit: 16, .. })
    ));
}

#[test]
fn test_display_renders_tree() {
    let tree = must_parse_verbatim("<div id=\"main\"><b>hi there</b></div>");
    assert_eq!(
        tree.to_string(),
        "Document\n  <div id=\"main\">\n    <b>\n      \"hi\u{00B7}there\"\n"
    );
}
