//! Node arena for the custom extraction pipeline.
//!
//! HTML is parsed with `dom_query` (html5ever) and copied into a [`DomTree`]:
//! a flat vector of nodes addressed by [`NodeId`], where each node stores its
//! child ids and one parent id. Comment nodes and whitespace-only text nodes
//! are dropped during the copy. Every walk over the tree uses an explicit
//! stack, so deeply nested markup cannot exhaust the call stack.

use dom_query::{Document, NodeRef};

use crate::error::{Error, Result};

/// Stable index of a node inside a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element or text payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a lower-cased tag name and its attributes.
    Element {
        /// Lower-cased tag name.
        tag: String,
        /// Attributes in document order, names lower-cased.
        attrs: Vec<(String, String)>,
    },
    /// A text node with entities already decoded by the tokenizer.
    Text(String),
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct DomNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DomNode {
    /// Element or text payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// Parsed HTML document as an index arena.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<DomNode>,
    root: NodeId,
}

impl DomTree {
    /// Parse an HTML document.
    ///
    /// The root of the tree is the `<html>` element the parser synthesizes
    /// for any input.
    pub fn parse(html: &str) -> Result<Self> {
        let document = Document::from(html);
        let html_selection = document.select("html");
        let Some(html_node) = html_selection.nodes().first() else {
            return Err(Error::Parse("document has no root element".to_string()));
        };
        Ok(Self::from_node(html_node))
    }

    fn from_node(source_root: &NodeRef) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.push(element_kind(source_root), None);

        let mut stack = vec![(source_root.clone(), NodeId(0))];
        while let Some((source, id)) = stack.pop() {
            let mut pending = Vec::new();
            for child in source.children() {
                let kind = if child.is_element() {
                    element_kind(&child)
                } else if child.is_text() {
                    let text = child.text().to_string();
                    if text.trim().is_empty() {
                        continue;
                    }
                    NodeKind::Text(text)
                } else {
                    continue;
                };
                let is_element = matches!(kind, NodeKind::Element { .. });
                let child_id = tree.push(kind, Some(id));
                if is_element {
                    pending.push((child, child_id));
                }
            }
            // children were assigned ids in order; descend in any order
            stack.extend(pending);
        }
        tree
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// The `<html>` root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.0]
    }

    /// Lower-cased tag name, `None` for text nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Attribute value by (case-insensitive) name.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent node, `None` for the root and for deleted subtrees.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Concatenated text of all descendant text nodes, in document order.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.nodes[current.0].kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element { .. } => {
                    stack.extend(self.nodes[current.0].children.iter().rev());
                }
            }
        }
        out
    }

    /// Elements reachable from the root whose tag is one of `tags`, in
    /// document order.
    #[must_use]
    pub fn find(&self, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|&id| self.tag(id).is_some_and(|tag| tags.contains(&tag)))
            .collect()
    }

    /// Pre-order walk of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            stack.extend(self.nodes[current.0].children.iter().rev());
            Some(current)
        })
    }

    /// Detach a subtree from its parent.
    ///
    /// The nodes stay in the arena but are no longer reachable from the root.
    pub fn delete(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Number of nodes ever allocated, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes. A parsed tree always has a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn element_kind(node: &NodeRef) -> NodeKind {
    let tag = node
        .node_name()
        .map(|name| name.to_ascii_lowercase())
        .unwrap_or_default();
    let attrs = node
        .attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string().to_ascii_lowercase(), attr.value.to_string()))
        .collect();
    NodeKind::Element { tag, attrs }
}
