//! Text density scoring.
//!
//! Word and space counts are taken over a node's full descendant text. The
//! contribution subtracts the words of direct eligible children, since those
//! children are scored as candidates of their own.

use crate::dom::{DomTree, NodeId, NodeKind};

use super::candidates::is_eligible;

/// Ratio reported for nodes without words.
pub const NO_WORDS_RATIO: f64 = -1.0;

/// Density metrics of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    /// Whitespace-delimited tokens in the descendant text.
    pub word_count: usize,
    /// Single space characters in the descendant text.
    pub whitespace_count: usize,
    /// `whitespace_count / word_count`, or [`NO_WORDS_RATIO`] without words.
    pub ratio: f64,
    /// Words not attributable to direct eligible children. May be negative
    /// when tokens merge across child boundaries.
    pub contribution: isize,
}

/// A node paired with its density, valid for one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Scored node.
    pub node: NodeId,
    /// Its metrics.
    pub density: Density,
}

/// Whitespace-delimited token count.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of `' '` characters.
#[must_use]
pub fn whitespace_count(text: &str) -> usize {
    text.bytes().filter(|&b| b == b' ').count()
}

/// Spaces per word, or [`NO_WORDS_RATIO`] when there are no words.
#[must_use]
pub fn ratio(whitespace_count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        NO_WORDS_RATIO
    } else {
        whitespace_count as f64 / word_count as f64
    }
}

/// Word and space counts of a piece of text, plus what its edges look like.
///
/// Concatenating two texts fuses the last token of the first with the first
/// token of the second when neither side has whitespace at the seam, so the
/// edges are enough to combine counts without rebuilding the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Whitespace-delimited tokens.
    pub words: usize,
    /// `' '` characters.
    pub spaces: usize,
    empty: bool,
    leading_whitespace: bool,
    trailing_whitespace: bool,
}

impl TextStats {
    /// Stats of the empty string.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    /// Stats of `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            words: word_count(text),
            spaces: whitespace_count(text),
            empty: text.is_empty(),
            leading_whitespace: text.starts_with(char::is_whitespace),
            trailing_whitespace: text.ends_with(char::is_whitespace),
        }
    }

    /// Stats of `self` followed directly by `next`.
    #[must_use]
    pub fn join(self, next: Self) -> Self {
        if self.empty {
            return next;
        }
        if next.empty {
            return self;
        }
        let fused = !self.trailing_whitespace && !next.leading_whitespace;
        Self {
            words: self.words + next.words - usize::from(fused),
            spaces: self.spaces + next.spaces,
            empty: false,
            leading_whitespace: self.leading_whitespace,
            trailing_whitespace: next.trailing_whitespace,
        }
    }
}

/// Per-node [`TextStats`] of the descendant text, for every node reachable
/// from the root.
///
/// Built in one post-order pass, so scoring a whole page stays linear in its
/// size however deep it nests.
#[derive(Debug, Clone)]
pub struct TextIndex {
    stats: Vec<TextStats>,
}

impl TextIndex {
    /// Index the subtree under the tree's root.
    #[must_use]
    pub fn build(tree: &DomTree) -> Self {
        let mut stats = vec![TextStats::empty(); tree.len()];
        let mut stack = vec![(tree.root(), false)];

        while let Some((id, expanded)) = stack.pop() {
            if let NodeKind::Text(text) = tree.node(id).kind() {
                stats[id.index()] = TextStats::of(text);
                continue;
            }
            if expanded {
                stats[id.index()] = tree
                    .children(id)
                    .iter()
                    .fold(TextStats::empty(), |acc, child| acc.join(stats[child.index()]));
                continue;
            }
            stack.push((id, true));
            stack.extend(tree.children(id).iter().map(|&child| (child, false)));
        }
        Self { stats }
    }

    /// Stats of the text below `node`.
    #[must_use]
    pub fn stats(&self, node: NodeId) -> TextStats {
        self.stats[node.index()]
    }

    /// Word count of the text below `node`.
    #[must_use]
    pub fn word_count(&self, node: NodeId) -> usize {
        self.stats(node).words
    }
}

/// Score a node using a prebuilt index.
#[must_use]
pub fn score_indexed(tree: &DomTree, index: &TextIndex, node: NodeId) -> Density {
    let own = index.stats(node);

    let children_words: usize = tree
        .children(node)
        .iter()
        .filter(|&&child| tree.tag(child).is_some_and(is_eligible))
        .map(|&child| index.word_count(child))
        .sum();

    Density {
        word_count: own.words,
        whitespace_count: own.spaces,
        ratio: ratio(own.spaces, own.words),
        contribution: own.words as isize - children_words as isize,
    }
}

/// Score a single node.
///
/// Indexes the whole tree first; use [`score_indexed`] when scoring many
/// nodes of the same tree.
#[must_use]
pub fn score(tree: &DomTree, node: NodeId) -> Density {
    score_indexed(tree, &TextIndex::build(tree), node)
}

/// Score a node into a [`Candidate`].
#[must_use]
pub fn candidate(tree: &DomTree, index: &TextIndex, node: NodeId) -> Candidate {
    Candidate {
        node,
        density: score_indexed(tree, index, node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(html: &str) -> DomTree {
        DomTree::parse(html).expect("parses")
    }

    #[test]
    fn counts_words_and_spaces() {
        let t = tree("<html><body><div>one two  three</div></body></html>");
        let div = t.find(&["div"])[0];
        let d = score(&t, div);
        assert_eq!(d.word_count, 3);
        assert_eq!(d.whitespace_count, 3);
        assert!((d.ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_is_sentinel_without_words() {
        let t = tree("<html><body><div><span></span></div></body></html>");
        let div = t.find(&["div"])[0];
        let d = score(&t, div);
        assert_eq!(d.word_count, 0);
        assert_eq!(d.ratio, NO_WORDS_RATIO);
        assert_eq!(d.contribution, 0);
    }

    #[test]
    fn ratio_is_non_negative_with_words() {
        let t = tree("<html><body><div>single</div></body></html>");
        let d = score(&t, t.find(&["div"])[0]);
        assert_eq!(d.word_count, 1);
        assert_eq!(d.ratio, 0.0);
    }

    #[test]
    fn contribution_excludes_eligible_children_only() {
        let t = tree(
            "<html><body><div id=\"outer\">lead words here \
             <div>inner div words </div><p>paragraph words count </p><span>span words</span></div></body></html>",
        );
        let outer = t.find(&["div"])[0];
        let d = score(&t, outer);
        assert_eq!(d.word_count, 11);
        // inner div (3) and span (2) are eligible; the paragraph is not
        assert_eq!(d.contribution, 6);
    }

    #[test]
    fn contribution_can_go_negative_when_tokens_merge() {
        let t = tree("<html><body><section><div>ab</div><div>cd</div></section></body></html>");
        let section = t.find(&["section"])[0];
        let d = score(&t, section);
        assert_eq!(d.word_count, 1);
        assert_eq!(d.contribution, -1);
    }

    #[test]
    fn joined_stats_match_counting_the_joined_text() {
        let pieces = ["ab", " cd ", "ef", "", "  ", "gh ij", "kl", " "];
        for a in pieces {
            for b in pieces {
                let joined = format!("{a}{b}");
                let stats = TextStats::of(a).join(TextStats::of(b));
                assert_eq!(stats.words, word_count(&joined), "{a:?} + {b:?}");
                assert_eq!(stats.spaces, whitespace_count(&joined), "{a:?} + {b:?}");
            }
        }
    }

    #[test]
    fn index_agrees_with_node_text() {
        let t = tree(
            "<html><body><div>lead<b>bold</b> tail <i> it </i></div><ul><li>a b</li><li>c</li></ul>\
             <section><div>ab</div><div>cd</div></section><div><span></span></div></body></html>",
        );
        let index = TextIndex::build(&t);
        for node in t.descendants(t.root()) {
            let text = t.text(node);
            assert_eq!(index.word_count(node), word_count(&text));
            assert_eq!(index.stats(node).spaces, whitespace_count(&text));
        }
    }

    #[test]
    fn deleted_subtrees_are_not_indexed() {
        let mut t = tree("<html><body><div>keep these</div><aside>drop all of these words</aside></body></html>");
        for id in t.find(&["aside"]) {
            t.delete(id);
        }
        let body = t.find(&["body"])[0];
        assert_eq!(TextIndex::build(&t).word_count(body), 2);
    }
}
