//! Node tree shared by the htmlmatch builder and matcher.
//!
//! This crate provides an arena-based tree modelled on the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) node relationships.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships
//! (parent, first/last child, next/previous sibling), providing O(1) traversal
//! in any direction without reference cycles. Read-only consumers navigate
//! through [`NodeRef`], a copyable handle pairing a tree with an index.
//!
//! Trees are built once and are immutable afterwards, so they can be shared
//! between threads freely.

use std::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumDiscriminants};

/// A type-safe index into a [`DomTree`].
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Id of the Document node, the first node every tree allocates.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// A single `name="value"` pair as written on a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}=\"{}\"", self.name, self.value)
        }
    }
}

/// Tag name and attributes of an element.
///
/// Attributes are kept in source order. Duplicates are preserved: unlike a
/// conforming HTML parser, nothing here removes a repeated attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data with the given tag name and attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
        }
    }

    /// Returns the value of the first attribute called `name`, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(NodeKind), derive(Display, Hash))]
pub enum NodeType {
    /// The implicit root every tree starts with.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// Holds the doctype name.
    Doctype(String),
}

impl NodeType {
    /// The discriminant of this node type.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        NodeKind::from(self)
    }

    /// The node's primary string: the tag name for elements, the character
    /// data for text and comments, the name for doctypes, and the empty
    /// string for the document.
    #[must_use]
    pub fn data(&self) -> &str {
        match self {
            Self::Document => "",
            Self::Element(data) => &data.tag_name,
            Self::Text(data) | Self::Comment(data) | Self::Doctype(data) => data,
        }
    }

    /// The attribute list; empty for everything but elements.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Element(data) => &data.attrs,
            _ => &[],
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node stores indices for its parent, child and sibling relationships.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-first-child)
    /// "The first child of an object is its first child or null if it has no
    /// children."
    pub first_child: Option<NodeId>,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-last-child)
    /// "The last child of an object is its last child or null if it has no
    /// children."
    pub last_child: Option<NodeId>,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    /// "The next sibling of an object is its first following sibling or null
    /// if it has no following sibling."
    pub next_sibling: Option<NodeId>,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    /// "The previous sibling of an object is its first preceding sibling or
    /// null if it has no preceding sibling."
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// Arena-based node tree with O(1) node access and traversal.
///
/// All nodes live in one contiguous vector and refer to each other by
/// [`NodeId`]. The Document node is always at [`NodeId::ROOT`]; a parsed
/// fragment's top-level nodes are its children.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Id of the Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, the Document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false once constructed: the Document node is allocated up front.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store `node_type` as a new detached node; link it with
    /// [`DomTree::append_child`].
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends the detached node `child` as the last child of `parent`,
    /// updating the parent's first/last links and the sibling chain.
    ///
    /// # Panics
    ///
    /// Panics if either ID does not belong to this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "append_child expects a detached node"
        );
        let prev_last_child = self.nodes[parent.0].last_child;

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev_last_child;
        node.next_sibling = None;

        match prev_last_child {
            Some(prev_id) => self.nodes[prev_id.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Parent of `id`, `None` for the Document and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Sibling after `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Sibling before `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over the children of a node, first to last.
    #[must_use]
    pub fn children(&self, id: NodeId) -> ChildIds<'_> {
        ChildIds {
            tree: self,
            current: self.first_child(id),
        }
    }

    /// Element data of `id`, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Character data of `id`, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// A navigable handle to `id`, or `None` if it is not in this tree.
    #[must_use]
    pub fn get_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { tree: self, id })
    }

    /// A handle to the Document node.
    #[must_use]
    pub const fn document(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// The first top-level node, i.e. the first child of the Document.
    ///
    /// For a parsed fragment this is the fragment's root node; any further
    /// top-level nodes follow it through [`NodeRef::next_sibling`].
    #[must_use]
    pub fn top_level(&self) -> Option<NodeRef<'_>> {
        self.document().first_child()
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        let prefix = "  ".repeat(indent);
        match &node.node_type {
            NodeType::Document => writeln!(f, "{prefix}Document")?,
            NodeType::Element(data) => {
                write!(f, "{prefix}<{}", data.tag_name)?;
                for attr in &data.attrs {
                    write!(f, " {attr}")?;
                }
                writeln!(f, ">")?;
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(f, "{prefix}\"{display}\"")?;
            }
            NodeType::Comment(data) => writeln!(f, "{prefix}<!-- {data} -->")?,
            NodeType::Doctype(name) => writeln!(f, "{prefix}<!DOCTYPE {name}>")?,
        }
        for child_id in self.children(id) {
            self.fmt_subtree(f, child_id, indent + 1)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the tree one node per line, children indented under their parent.
/// Spaces in text are shown as `·` and newlines as `\n`.
impl fmt::Display for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(f, NodeId::ROOT, 0)
    }
}

/// Iterator over the child IDs of a node.
pub struct ChildIds<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for ChildIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}

/// A borrowed, copyable handle to one node of a [`DomTree`].
///
/// Navigation methods return further handles into the same tree, so sibling
/// chains can be walked the way a pointer-linked tree would be.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The index of this node.
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub const fn tree(self) -> &'a DomTree {
        self.tree
    }

    /// The underlying node record.
    #[must_use]
    pub fn node(self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    /// The node's type and payload.
    #[must_use]
    pub fn node_type(self) -> &'a NodeType {
        &self.node().node_type
    }

    /// The node's discriminant.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.node_type().kind()
    }

    /// See [`NodeType::data`].
    #[must_use]
    pub fn data(self) -> &'a str {
        self.node_type().data()
    }

    /// See [`NodeType::attributes`].
    #[must_use]
    pub fn attributes(self) -> &'a [Attribute] {
        self.node_type().attributes()
    }

    /// The parent node, if any.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.link(self.node().parent)
    }

    /// The first child, if any.
    #[must_use]
    pub fn first_child(self) -> Option<Self> {
        self.link(self.node().first_child)
    }

    /// The last child, if any.
    #[must_use]
    pub fn last_child(self) -> Option<Self> {
        self.link(self.node().last_child)
    }

    /// The following sibling, if any.
    #[must_use]
    pub fn next_sibling(self) -> Option<Self> {
        self.link(self.node().next_sibling)
    }

    /// The preceding sibling, if any.
    #[must_use]
    pub fn prev_sibling(self) -> Option<Self> {
        self.link(self.node().prev_sibling)
    }

    /// Iterate over this node's children, first to last.
    #[must_use]
    pub fn children(self) -> Children<'a> {
        Children {
            current: self.first_child(),
        }
    }

    fn link(self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self {
            tree: self.tree,
            id,
        })
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node_type", self.node_type())
            .finish()
    }
}

/// Iterator over the children of a [`NodeRef`].
pub struct Children<'a> {
    current: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next_sibling();
        Some(node)
    }
}
