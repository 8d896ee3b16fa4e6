//! Best-node selection.
//!
//! A single forward pass over the scored candidates. A candidate must beat
//! the incumbent's contribution to be considered at all, and then replaces it
//! when the incumbent is still empty, when it improves the contribution by at
//! least [`IMPROVEMENT_THRESHOLD`], or when its ratio is at most the
//! incumbent's ratio. The outcome depends on enumeration order.

use crate::dom::NodeId;

use super::density::{Candidate, NO_WORDS_RATIO};

/// Minimum contribution ratio that displaces the incumbent on size alone.
pub const IMPROVEMENT_THRESHOLD: f64 = 1.10;

/// Improvement ratio used while there is no incumbent.
const FIRST_CANDIDATE_IMPROVEMENT: f64 = 100.0;

/// Online selector state.
#[derive(Debug, Clone)]
pub struct BestNodeSelector {
    best_contribution: isize,
    best_ratio: f64,
    best_node: Option<NodeId>,
}

impl Default for BestNodeSelector {
    fn default() -> Self {
        Self {
            best_contribution: 0,
            best_ratio: NO_WORDS_RATIO,
            best_node: None,
        }
    }
}

impl BestNodeSelector {
    /// Fresh selector with no incumbent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consider one candidate. Returns `true` when it became the incumbent.
    pub fn offer(&mut self, candidate: &Candidate) -> bool {
        let density = &candidate.density;
        if density.contribution <= self.best_contribution {
            return false;
        }

        let improvement = if self.best_contribution == 0 {
            FIRST_CANDIDATE_IMPROVEMENT
        } else {
            density.contribution as f64 / self.best_contribution as f64
        };

        if self.best_contribution == 0
            || improvement >= IMPROVEMENT_THRESHOLD
            || density.ratio <= self.best_ratio
        {
            self.best_contribution = density.contribution;
            self.best_ratio = density.ratio;
            self.best_node = Some(candidate.node);
            return true;
        }
        false
    }

    /// Current incumbent.
    #[must_use]
    pub fn best(&self) -> Option<NodeId> {
        self.best_node
    }

    /// Contribution of the current incumbent (0 without one).
    #[must_use]
    pub fn best_contribution(&self) -> isize {
        self.best_contribution
    }
}

/// Run the selector over a candidate sequence.
#[must_use]
pub fn select<I>(candidates: I) -> Option<NodeId>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut selector = BestNodeSelector::new();
    for candidate in candidates {
        selector.offer(&candidate);
    }
    selector.best()
}
