//! Backend API client and response types.

pub mod client;
pub mod types;

pub use client::{BackendClient, StaticToken, TokenProvider};
pub use types::{Alert, AlertSeverity, ChatAnswer, Connector, Summary};
