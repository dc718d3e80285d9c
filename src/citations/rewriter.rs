//! Citation rewriting for AI-generated answer markdown.
//!
//! The backend's answer text cites retrieved documents inline as bracketed
//! names, e.g. `[Invoice_2024.pdf]`. This pass resolves each bracket against
//! the answer's source list, assigns dense citation numbers in first-seen
//! order, and replaces the bracket with a `{{cite:N}}` placeholder token that
//! the segmenter later turns into an interactive marker. Brackets that match
//! no source pass through verbatim — they may be ordinary markdown.
//!
//! Matching is deliberately loose: the LLM paraphrases filenames, so a
//! candidate matches a source when either name contains the other,
//! case-insensitively, and the first source in list order wins. No priority
//! is given to exact matches over substring matches.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One retrieved document/snippet that contributed to an answer.
///
/// Only `index`, `document_name`, and `file_url` participate in citation
/// matching; the remaining fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Position of this source within one answer's source list.
    pub index: i64,
    /// Display name of the originating document.
    #[serde(alias = "documentName")]
    pub document_name: String,
    /// Connector the document came from (gmail, outlook, gdrive, quickbooks).
    #[serde(default)]
    pub origin: Option<String>,
    /// When the document was created or last modified upstream.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Short preview snippet of the document text.
    #[serde(default)]
    pub preview: Option<String>,
    /// Direct URL to the stored file, if one exists.
    #[serde(default, alias = "fileUrl")]
    pub file_url: Option<String>,
}

/// Per-rewrite mapping from `Source.index` to citation number.
///
/// Numbers are dense, start at 1, and are assigned in first-seen order; the
/// same source cited repeatedly keeps its first number. Built fresh for each
/// rewrite, never persisted.
#[derive(Debug, Clone, Default)]
pub struct CitationAssignments {
    numbers: HashMap<i64, usize>,
    order: Vec<i64>,
}

impl CitationAssignments {
    /// Return the citation number for `source_index`, assigning the next
    /// number on first sight.
    fn assign(&mut self, source_index: i64) -> usize {
        if let Some(&n) = self.numbers.get(&source_index) {
            return n;
        }
        self.order.push(source_index);
        let n = self.order.len();
        self.numbers.insert(source_index, n);
        n
    }

    /// The source index assigned to citation `number`, if any.
    pub fn source_index(&self, number: usize) -> Option<i64> {
        if number == 0 {
            return None;
        }
        self.order.get(number - 1).copied()
    }

    /// The citation number assigned to `source_index`, if any.
    pub fn number_for(&self, source_index: i64) -> Option<usize> {
        self.numbers.get(&source_index).copied()
    }

    /// Number of distinct sources cited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` if no citations were assigned.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of one rewrite pass: the transformed text plus the citation
/// numbering needed to resolve `{{cite:N}}` tokens back to sources.
#[derive(Debug, Clone)]
pub struct RewrittenAnswer {
    /// Answer text with matched brackets replaced by placeholder tokens.
    pub text: String,
    /// Citation numbering built during the pass.
    pub assignments: CitationAssignments,
}

/// Placeholder token for citation `number`, as emitted into rewritten text.
pub fn citation_token(number: usize) -> String {
    format!("{{{{cite:{}}}}}", number)
}

// Markdown links first so `[text](url)` is never consumed as a bare bracket;
// bare brackets are one-or-more non-`]` characters, no nesting.
static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)|\[([^\]]+)\]").unwrap());

/// Rewrite `text`, replacing bracketed document-name citations with
/// `{{cite:N}}` tokens resolved against `sources`.
///
/// Bare brackets that match a source are replaced outright. Markdown links
/// whose URL contains a source's `file_url` keep the link and get a token
/// appended after it. Everything else passes through unchanged; with an
/// empty source list the output equals the input.
pub fn rewrite(text: &str, sources: &[Source]) -> RewrittenAnswer {
    let mut assignments = CitationAssignments::default();
    if sources.is_empty() {
        return RewrittenAnswer {
            text: text.to_string(),
            assignments,
        };
    }

    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in CITATION_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        out.push_str(&text[last_end..whole.start()]);
        last_end = whole.end();

        if let Some(url) = caps.get(2) {
            // Markdown link: keep it, append a token when the URL points at
            // a known source file.
            out.push_str(whole.as_str());
            if let Some(source) = match_by_file_url(sources, url.as_str()) {
                let n = assignments.assign(source.index);
                out.push_str(&citation_token(n));
            }
        } else {
            // Bare bracket: replace on match, pass through otherwise.
            let candidate = caps.get(3).unwrap().as_str();
            match match_by_name(sources, candidate) {
                Some(source) => {
                    let n = assignments.assign(source.index);
                    out.push_str(&citation_token(n));
                }
                None => out.push_str(whole.as_str()),
            }
        }
    }
    out.push_str(&text[last_end..]);

    RewrittenAnswer {
        text: out,
        assignments,
    }
}

/// First source in list order whose document name loosely matches
/// `candidate`: case-insensitive equality or either-direction containment.
/// Equality is subsumed by containment; both directions are checked so that
/// a truncated or over-qualified LLM rendering of the filename still hits.
fn match_by_name<'a>(sources: &'a [Source], candidate: &str) -> Option<&'a Source> {
    let candidate = candidate.to_lowercase();
    sources.iter().find(|s| {
        let name = s.document_name.to_lowercase();
        !name.is_empty() && (name.contains(&candidate) || candidate.contains(&name))
    })
}

/// First source in list order whose `file_url` appears inside `url`.
fn match_by_file_url<'a>(sources: &'a [Source], url: &str) -> Option<&'a Source> {
    sources.iter().find(|s| {
        s.file_url
            .as_deref()
            .map(|f| !f.is_empty() && url.contains(f))
            .unwrap_or(false)
    })
}
