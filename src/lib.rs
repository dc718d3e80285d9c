//! Client core for the BriefLens business-intelligence dashboard.
//!
//! The heavy lifting — document ingestion, retrieval, summarization, alert
//! detection — happens in the backend service. This crate is the UI side's
//! data layer:
//!
//! - [`api::BackendClient`] — bearer-authenticated JSON client for the
//!   backend HTTP API
//! - [`cache::RequestCache`] — TTL memoization for read-mostly GETs, with
//!   key- and pattern-based invalidation
//! - [`citations`] — rewrites bracketed document citations in AI answers
//!   into numbered interactive markers
//! - [`structured`] — tolerant decoding of heterogeneous widget payloads

pub mod api;
pub mod cache;
pub mod citations;
pub mod config;
pub mod error;
pub mod structured;

pub use api::{BackendClient, ChatAnswer, StaticToken, TokenProvider};
pub use cache::RequestCache;
pub use citations::{rewrite, segment, RewrittenAnswer, Segment, Source};
pub use config::{CacheConfig, ClientConfig};
pub use error::{BriefLensError, Result};
pub use structured::decode_structured_data;
