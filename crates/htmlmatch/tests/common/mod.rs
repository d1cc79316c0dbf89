//! Shared helpers for matcher tests.

use html5ever::{ParseOpts, parse_document};
use html5ever::tendril::TendrilSink;
use htmlmatch_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a complete document the way a browser would (implied `<html>`,
/// `<head>`, `<body>` and `<tbody>`), and copy it into a [`DomTree`].
pub fn parse_compliant(html: &str) -> DomTree {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut tree = DomTree::new();
    for child in dom.document.children.borrow().iter() {
        copy_node(&mut tree, NodeId::ROOT, child);
    }
    tree
}

fn copy_node(tree: &mut DomTree, parent: NodeId, handle: &Handle) {
    let node_type = match &handle.data {
        NodeData::Doctype { name, .. } => NodeType::Doctype(name.to_string()),
        NodeData::Text { contents } => NodeType::Text(contents.borrow().to_string()),
        NodeData::Comment { contents } => NodeType::Comment(contents.to_string()),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| Attribute::new(attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            NodeType::Element(ElementData::new(name.local.to_string(), attrs))
        }
        NodeData::Document | NodeData::ProcessingInstruction { .. } => return,
    };
    let id = tree.alloc(node_type);
    tree.append_child(parent, id);
    for child in handle.children.borrow().iter() {
        copy_node(tree, id, child);
    }
}
