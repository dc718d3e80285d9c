//! Backend response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::citations::Source;

/// Answer to a conversational search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Markdown answer text, with bracketed document-name citations.
    pub answer: String,
    /// Sources that contributed to the answer, in backend order.
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Optional widget payload; decode with
    /// [`decode_structured_data`](crate::structured::decode_structured_data).
    #[serde(default)]
    pub structured_data: Option<Value>,
}

/// Severity of a detected alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// An AI-detected alert (overdue invoice, unusual spend, missed email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub severity: AlertSeverity,
    /// Connector the underlying data came from.
    #[serde(default)]
    pub connector: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A periodic AI-generated digest of one data stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub connector: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// A linked third-party data connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    /// Stable connector id, also the prefix of its cache key family
    /// (e.g. `quickbooks`).
    pub id: String,
    pub provider: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_answer_decodes_with_sources() {
        let value = json!({
            "answer": "See [Invoice_2024.pdf]",
            "sources": [
                {"index": 0, "document_name": "Invoice_2024.pdf", "origin": "gdrive"}
            ]
        });
        let answer: ChatAnswer = serde_json::from_value(value).unwrap();
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].document_name, "Invoice_2024.pdf");
        assert!(answer.structured_data.is_none());
    }

    #[test]
    fn test_chat_answer_tolerates_missing_sources() {
        let value = json!({"answer": "plain"});
        let answer: ChatAnswer = serde_json::from_value(value).unwrap();
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_alert_severity_serde() {
        let sev: AlertSeverity = serde_json::from_str(r#""critical""#).unwrap();
        assert_eq!(sev, AlertSeverity::Critical);
        assert_eq!(serde_json::to_string(&sev).unwrap(), r#""critical""#);
    }

    #[test]
    fn test_alert_defaults_severity_to_info() {
        let value = json!({
            "id": "a1",
            "title": "Overdue invoice",
            "created_at": "2026-08-01T09:30:00Z"
        });
        let alert: Alert = serde_json::from_value(value).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Info);
        assert!(alert.connector.is_none());
    }
}
