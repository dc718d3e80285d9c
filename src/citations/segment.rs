//! Splitting rewritten text into renderable segments.
//!
//! The markdown renderer hands each text node through [`segment`], which
//! splits on `{{cite:N}}` tokens and yields an interleaved sequence of plain
//! text and citation markers. The embedding UI maps `Segment::Citation` to a
//! clickable numeric badge whose handler receives the resolved [`Source`];
//! a number that no longer resolves (stale source list) still renders its
//! badge but carries no source, so the marker is disabled rather than wrong.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rewriter::{CitationAssignments, Source};

static CITE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{cite:(\d+)\}\}").unwrap());

/// One renderable piece of a rewritten text node.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Plain text, rendered as-is.
    Text(String),
    /// A citation marker.
    Citation {
        /// Citation number displayed on the badge.
        number: usize,
        /// The cited source, when it resolves. `None` renders a disabled
        /// marker with no click-through.
        source: Option<Source>,
    },
}

impl Segment {
    /// Supplementary display text for a marker (tooltip), when resolvable.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Segment::Citation {
                source: Some(s), ..
            } => Some(&s.document_name),
            _ => None,
        }
    }
}

/// Split `text` on citation placeholder tokens.
///
/// Each token becomes a [`Segment::Citation`] resolved through `assignments`
/// and `sources`; everything between tokens becomes [`Segment::Text`]. Empty
/// text fragments (adjacent tokens, leading/trailing tokens) are dropped.
pub fn segment(
    text: &str,
    assignments: &CitationAssignments,
    sources: &[Source],
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;
    for caps in CITE_TOKEN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            segments.push(Segment::Text(text[last_end..whole.start()].to_string()));
        }
        last_end = whole.end();

        // The token alphabet is \d+ so parse only overflows on absurd input;
        // treat that as an unresolvable number rather than a panic.
        let number: usize = caps[1].parse().unwrap_or(0);
        let source = assignments
            .source_index(number)
            .and_then(|idx| sources.iter().find(|s| s.index == idx))
            .cloned();
        segments.push(Segment::Citation { number, source });
    }
    if last_end < text.len() {
        segments.push(Segment::Text(text[last_end..].to_string()));
    }
    segments
}
