//! Peer analysis.
//!
//! A selected node that sits among several similarly sized siblings is
//! usually one block of a larger content container (one paragraph-like `div`
//! among many). In that case the parent is returned instead.

use crate::dom::{DomTree, NodeId};

use super::density::TextIndex;

/// Half-width of the word count band around the selected node.
pub const PEER_RANGE: f64 = 0.50;

/// More than this many peers inside the band promotes the parent.
pub const PEER_THRESHOLD: usize = 2;

/// Count the parent's children whose word count lies strictly inside
/// `(1 - PEER_RANGE, 1 + PEER_RANGE)` times the node's own word count.
///
/// Every child of the parent is inspected, whatever its tag, the node itself
/// included.
#[must_use]
pub fn count_peers(tree: &DomTree, index: &TextIndex, node: NodeId) -> usize {
    let Some(parent) = tree.parent(node) else {
        return 0;
    };

    let own = index.word_count(node) as f64;
    let lower = own * (1.0 - PEER_RANGE);
    let upper = own * (1.0 + PEER_RANGE);

    tree.children(parent)
        .iter()
        .map(|&child| index.word_count(child))
        .filter(|&words| words != 0)
        .filter(|&words| {
            let words = words as f64;
            words > lower && words < upper
        })
        .count()
}

/// Widen the selection to the parent when enough peers exist.
#[must_use]
pub fn rescope(tree: &DomTree, index: &TextIndex, node: NodeId) -> NodeId {
    let Some(parent) = tree.parent(node) else {
        tracing::debug!("selected node has no parent; keeping it");
        return node;
    };

    let peers = count_peers(tree, index, node);
    if peers > PEER_THRESHOLD {
        tracing::debug!(peers, parent = ?tree.tag(parent), "similar peers found; promoting parent");
        parent
    } else {
        tracing::debug!(peers, "not enough similar peers; keeping selection");
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, tag: &str) -> String {
        format!("word{tag} ").repeat(n)
    }

    #[test]
    fn four_similar_children_promote_parent() {
        let html = format!(
            "<html><body><div id=\"wrap\"><div id=\"target\">{}</div><div>{}</div><p>{}</p><div>{}</div></div></body></html>",
            words(10, "a"),
            words(9, "b"),
            words(12, "c"),
            words(14, "d"),
        );
        let tree = DomTree::parse(&html).expect("parses");
        let target = tree
            .find(&["div"])
            .into_iter()
            .find(|&id| tree.attr(id, "id") == Some("target"))
            .expect("target present");

        assert_eq!(count_peers(&tree, &TextIndex::build(&tree), target), 4);
        let chosen = rescope(&tree, &TextIndex::build(&tree), target);
        assert_eq!(tree.attr(chosen, "id"), Some("wrap"));
    }

    #[test]
    fn two_similar_children_keep_selection() {
        let html = format!(
            "<html><body><div id=\"wrap\"><div id=\"target\">{}</div><div>{}</div><div>{}</div><div>{}</div></div></body></html>",
            words(10, "a"),
            words(11, "b"),
            words(40, "c"),
            words(2, "d"),
        );
        let tree = DomTree::parse(&html).expect("parses");
        let target = tree
            .find(&["div"])
            .into_iter()
            .find(|&id| tree.attr(id, "id") == Some("target"))
            .expect("target present");

        assert_eq!(count_peers(&tree, &TextIndex::build(&tree), target), 2);
        assert_eq!(rescope(&tree, &TextIndex::build(&tree), target), target);
    }

    #[test]
    fn band_edges_are_exclusive() {
        // own = 10 words: 5 and 15 sit on the band edges and do not count
        let html = format!(
            "<html><body><div><div id=\"target\">{}</div><div>{}</div><div>{}</div><div>{}</div></div></body></html>",
            words(10, "a"),
            words(5, "b"),
            words(15, "c"),
            words(6, "d"),
        );
        let tree = DomTree::parse(&html).expect("parses");
        let target = tree
            .find(&["div"])
            .into_iter()
            .find(|&id| tree.attr(id, "id") == Some("target"))
            .expect("target present");

        assert_eq!(count_peers(&tree, &TextIndex::build(&tree), target), 2);
    }

    #[test]
    fn root_is_returned_unchanged() {
        let tree = DomTree::parse("<html><body>text</body></html>").expect("parses");
        assert_eq!(rescope(&tree, &TextIndex::build(&tree), tree.root()), tree.root());
    }
}
