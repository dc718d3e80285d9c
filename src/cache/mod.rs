//! TTL-based request memoization with explicit invalidation.

pub mod request_cache;

pub use request_cache::RequestCache;
