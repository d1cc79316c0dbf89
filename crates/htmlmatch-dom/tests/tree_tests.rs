//! Tests for arena construction and navigation.

use htmlmatch_dom::{Attribute, DomTree, ElementData, NodeId, NodeKind, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, Vec::new())))
}

fn assert_sibling_chain_consistent(tree: &DomTree, parent: NodeId) {
    let children: Vec<NodeId> = tree.children(parent).collect();
    assert_eq!(tree.first_child(parent), children.first().copied());
    assert_eq!(tree.last_child(parent), children.last().copied());
    for pair in children.windows(2) {
        assert_eq!(tree.next_sibling(pair[0]), Some(pair[1]));
        assert_eq!(tree.prev_sibling(pair[1]), Some(pair[0]));
    }
    for &child in &children {
        assert_eq!(tree.parent(child), Some(parent));
    }
}

#[test]
fn test_new_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.document().kind(), NodeKind::Document);
    assert!(tree.top_level().is_none());
    assert_eq!(tree.first_child(NodeId::ROOT), None);
    assert_eq!(tree.last_child(NodeId::ROOT), None);
}

#[test]
fn test_append_single_child() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);

    assert_eq!(tree.first_child(NodeId::ROOT), Some(div));
    assert_eq!(tree.last_child(NodeId::ROOT), Some(div));
    assert_eq!(tree.prev_sibling(div), None);
    assert_eq!(tree.next_sibling(div), None);
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
}

#[test]
fn test_append_three_children_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "li");
    let b = tree.alloc(NodeType::Text("  ".to_string()));
    let c = alloc_element(&mut tree, "li");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![a, b, c]);
    assert_sibling_chain_consistent(&tree, parent);
    assert_eq!(tree.first_child(a), None);
    assert_eq!(tree.last_child(a), None);
}

#[test]
fn test_node_ref_navigation() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, text);

    let top = tree.top_level().expect("top-level node");
    assert_eq!(top.id(), html);
    assert_eq!(top.data(), "html");

    let body_ref = top.first_child().expect("body");
    assert_eq!(body_ref.kind(), NodeKind::Element);
    assert_eq!(body_ref.parent(), Some(top));
    assert_eq!(body_ref.last_child().map(|n| n.data()), Some("hello"));
    assert_eq!(body_ref.next_sibling(), None);
    assert_eq!(body_ref.prev_sibling(), None);
    assert_eq!(tree.as_text(text), Some("hello"));
    assert!(tree.as_element(text).is_none());
}

#[test]
fn test_node_ref_equality_is_per_tree() {
    let mut first = DomTree::new();
    let mut second = DomTree::new();
    let a = alloc_element(&mut first, "a");
    let b = alloc_element(&mut second, "a");
    first.append_child(NodeId::ROOT, a);
    second.append_child(NodeId::ROOT, b);

    assert_eq!(first.top_level(), first.get_ref(a));
    assert_ne!(first.top_level(), second.top_level());
    assert!(first.get_ref(NodeId(42)).is_none());
}

#[test]
fn test_attributes_keep_order_and_duplicates() {
    let data = ElementData::new(
        "input",
        vec![
            Attribute::new("class", "a"),
            Attribute::new("type", "text"),
            Attribute::new("class", "b"),
        ],
    );
    assert_eq!(data.attribute("class"), Some("a"));
    assert_eq!(data.attribute("missing"), None);

    let node_type = NodeType::Element(data);
    let names: Vec<&str> = node_type
        .attributes()
        .iter()
        .map(|attr| attr.name.as_str())
        .collect();
    assert_eq!(names, ["class", "type", "class"]);
}

#[test]
fn test_node_type_data() {
    assert_eq!(NodeType::Document.data(), "");
    assert_eq!(NodeType::Text(" x ".to_string()).data(), " x ");
    assert_eq!(NodeType::Comment("note".to_string()).data(), "note");
    assert_eq!(NodeType::Doctype("html".to_string()).kind(), NodeKind::Doctype);
    assert!(NodeType::Text(String::new()).attributes().is_empty());
    assert_eq!(NodeKind::Text.to_string(), "Text");
}

#[test]
fn test_display_tree() {
    let mut tree = DomTree::new();
    let div = tree.alloc(NodeType::Element(ElementData::new(
        "div",
        vec![Attribute::new("id", "main"), Attribute::new("hidden", "")],
    )));
    let text = tree.alloc(NodeType::Text("a b\n".to_string()));
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, text);

    let expected = "Document\n  <div id=\"main\" hidden>\n    \"a\u{00B7}b\\n\"\n";
    assert_eq!(tree.to_string(), expected);
}
