//! Citation rewriting and render-time segmentation for answer markdown.

pub mod rewriter;
pub mod segment;

pub use rewriter::{citation_token, rewrite, CitationAssignments, RewrittenAnswer, Source};
pub use segment::{segment, Segment};
