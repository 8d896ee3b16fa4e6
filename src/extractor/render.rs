//! Plain-text reconstruction of a chosen subtree.
//!
//! Text children contribute their literal text. Element children contribute
//! their own rendering, prefixed with one space for the tags in
//! [`SPACED_TAGS`] so adjacent blocks do not fuse into one word. The parser
//! has already decoded character references in text nodes, which is the one
//! decoding pass the output receives.

use crate::dom::{DomTree, NodeId, NodeKind};

/// Tags rendered with a leading space.
pub static SPACED_TAGS: [&str; 2] = ["p", "li"];

/// Render the text below `node` (the node's own tag adds no space).
#[must_use]
pub fn render(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let mut stack: Vec<NodeId> = tree.children(node).iter().rev().copied().collect();

    while let Some(current) = stack.pop() {
        match tree.node(current).kind() {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, .. } => {
                if SPACED_TAGS.contains(&tag.as_str()) {
                    out.push(' ');
                }
                stack.extend(tree.children(current).iter().rev());
            }
        }
    }
    out
}
