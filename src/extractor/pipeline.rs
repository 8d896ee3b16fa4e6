//! Custom extraction pipeline.
//!
//! Parse, strip boilerplate elements, score every eligible element, pick the
//! best one, widen it to its parent when it has many similar peers, and
//! render it back to text.

use crate::dom::{DomTree, NodeId};
use crate::error::Result;

use super::candidates::enumerate;
use super::density::{self, TextIndex};
use super::peers::rescope;
use super::render::render;
use super::selection::BestNodeSelector;

/// Elements removed before scoring.
pub static BOILERPLATE_TAGS: [&str; 9] = [
    "script", "style", "header", "footer", "input", "button", "aside", "meta", "link",
];

/// Remove every [`BOILERPLATE_TAGS`] subtree from the tree.
pub fn strip_boilerplate(tree: &mut DomTree) {
    for id in tree.find(&BOILERPLATE_TAGS) {
        tree.delete(id);
    }
}

/// Select the content node of an already cleaned tree.
///
/// Returns the node after peer rescoping, or `None` when no candidate has a
/// positive contribution.
#[must_use]
pub fn select_content_node(tree: &DomTree) -> Option<NodeId> {
    let index = TextIndex::build(tree);
    let mut selector = BestNodeSelector::new();
    let mut scored = 0usize;

    for node in enumerate(tree, tree.root()) {
        let candidate = density::candidate(tree, &index, node);
        let d = &candidate.density;
        tracing::trace!(
            tag = tree.tag(node).unwrap_or_default(),
            class = tree.attr(node, "class").unwrap_or_default(),
            words = d.word_count,
            spaces = d.whitespace_count,
            ratio = d.ratio,
            contribution = d.contribution,
            best = selector.best_contribution(),
            "candidate"
        );
        if selector.offer(&candidate) {
            tracing::debug!(
                tag = tree.tag(node).unwrap_or_default(),
                contribution = d.contribution,
                "new best element"
            );
        }
        scored += 1;
    }

    tracing::debug!(candidates = scored, "scored candidate elements");
    selector.best().map(|best| rescope(tree, &index, best))
}

/// Run the custom pipeline over raw HTML.
///
/// `Ok(None)` means the page had no usable content node or it rendered to
/// whitespace only.
pub fn extract_text(html: &str) -> Result<Option<String>> {
    let mut tree = DomTree::parse(html)?;
    strip_boilerplate(&mut tree);

    let Some(node) = select_content_node(&tree) else {
        return Ok(None);
    };
    Ok(crate::text::non_empty(&render(&tree, node)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"<html lang="fr"><body><div class="ad">short spam</div><article><p>Sentence one with enough words to win.</p><p>Sentence two also with enough words.</p></article></body></html>"#;

    #[test]
    fn selects_article_over_short_ad() {
        let mut tree = DomTree::parse(ARTICLE_PAGE).expect("parses");
        strip_boilerplate(&mut tree);
        let node = select_content_node(&tree).expect("a node is selected");
        assert_eq!(tree.tag(node), Some("article"));
    }

    #[test]
    fn extracts_article_text() {
        let text = extract_text(ARTICLE_PAGE).expect("pipeline runs");
        assert_eq!(
            text.as_deref(),
            Some("Sentence one with enough words to win. Sentence two also with enough words.")
        );
    }

    #[test]
    fn boilerplate_is_removed_before_scoring() {
        let html = r#"<html><body>
            <header><div>Site header with lots of navigation words that should never be chosen at all</div></header>
            <div id="content">Real content words live here.</div>
            <script>var lots = "of script words that are not content at all really";</script>
        </body></html>"#;
        let text = extract_text(html).expect("pipeline runs");
        assert_eq!(text.as_deref(), Some("Real content words live here."));
    }

    #[test]
    fn empty_page_yields_none() {
        assert_eq!(extract_text("<html><body></body></html>").expect("pipeline runs"), None);
        assert_eq!(
            extract_text("<html><body><div><script>x()</script></div></body></html>").expect("pipeline runs"),
            None
        );
    }

    #[test]
    fn repeated_runs_agree() {
        let first = extract_text(ARTICLE_PAGE).expect("pipeline runs");
        for _ in 0..5 {
            assert_eq!(extract_text(ARTICLE_PAGE).expect("pipeline runs"), first);
        }
    }
}
