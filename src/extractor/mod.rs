//! Density-scoring content extraction.
//!
//! The extractor of last resort: it relies on no class-name conventions,
//! only on how words are distributed over block elements.
//!
//! # Module Structure
//!
//! - `candidates`: post-order enumeration of eligible elements
//! - `density`: word, space, ratio and contribution metrics
//! - `selection`: hysteresis-damped best node selection
//! - `peers`: promotion to the parent when siblings are similarly sized
//! - `render`: plain-text reconstruction of the chosen subtree
//! - `pipeline`: the steps above glued together
//!
//! # Usage
//!
//! ```rust
//! use article_extractor::extractor::pipeline;
//!
//! let html = "<html><body><div>menu</div><article><p>Some article words here.</p></article></body></html>";
//! let text = pipeline::extract_text(html)?;
//! assert_eq!(text.as_deref(), Some("Some article words here."));
//! # Ok::<(), article_extractor::Error>(())
//! ```

pub mod candidates;
pub mod density;
pub mod peers;
pub mod pipeline;
pub mod render;
pub mod selection;

pub use candidates::{enumerate, Candidates, ELIGIBLE_TAGS};
pub use density::{score, score_indexed, Candidate, Density, TextIndex, TextStats};
pub use peers::rescope;
pub use pipeline::{extract_text, select_content_node, strip_boilerplate};
pub use render::render;
pub use selection::{select, BestNodeSelector};
