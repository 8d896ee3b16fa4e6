//! Candidate enumeration.
//!
//! Flattens a tree into the elements that may hold the article body, in
//! post-order: every eligible descendant appears before its eligible
//! ancestors. Text nodes are never candidates.

use crate::dom::{DomTree, NodeId};

/// Tags that may be chosen as the content root.
pub static ELIGIBLE_TAGS: [&str; 10] = [
    "body", "form", "main", "div", "ul", "li", "table", "span", "section", "article",
];

/// Whether a tag name belongs to [`ELIGIBLE_TAGS`].
#[must_use]
pub fn is_eligible(tag: &str) -> bool {
    ELIGIBLE_TAGS.contains(&tag)
}

/// Post-order iterator over the eligible elements below (and including) a
/// root.
///
/// Single pass: once exhausted it stays exhausted. The walk keeps its own
/// stack instead of recursing.
pub struct Candidates<'a> {
    tree: &'a DomTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> Candidates<'a> {
    /// Start enumerating from `root`.
    #[must_use]
    pub fn new(tree: &'a DomTree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(root, false)],
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, expanded)) = self.stack.pop() {
            let Some(tag) = self.tree.tag(id) else {
                continue;
            };
            if expanded {
                if is_eligible(tag) {
                    return Some(id);
                }
                continue;
            }
            self.stack.push((id, true));
            self.stack
                .extend(self.tree.children(id).iter().rev().map(|&child| (child, false)));
        }
        None
    }
}

/// Enumerate candidates below `root`.
#[must_use]
pub fn enumerate(tree: &DomTree, root: NodeId) -> Candidates<'_> {
    Candidates::new(tree, root)
}
