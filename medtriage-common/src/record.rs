//! Triage record wire types.

use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;

/// One stored triage session as returned by the server.
///
/// The client only ever holds a read-only page of these. All fields other
/// than `session_id` are optional or defaulted so that both the paginated
/// admin listing and the leaner per-user listing deserialize into the same
/// shape. `created_at` is kept as the opaque server timestamp string; the
/// server emits naive ISO-8601 without an offset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageRecord {
    #[serde(default)]
    pub session_id: i64,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub predicted_conditions: Vec<String>,
    #[serde(default)]
    pub next_step: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Owning user, embedded when the admin listing can resolve one.
    #[serde(default)]
    pub user: Option<RecordUser>,
    /// Classification method reported by the server, when present.
    #[serde(default)]
    pub method: Option<String>,
    /// Server-side audit rows attached to this session.
    #[serde(default)]
    pub audits: Vec<RecordAudit>,
}

impl TriageRecord {
    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.user_email.as_deref())
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }

    /// Parse the server timestamp for sorting/display. The server emits
    /// naive ISO-8601 (`2025-10-11T00:09:58`), no offset.
    pub fn created_at_time(&self) -> Option<chrono::NaiveDateTime> {
        self.created_at
            .as_deref()
            .and_then(|raw| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordUser {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Server-side audit row attached to a session by the admin listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordAudit {
    #[serde(default)]
    pub log_id: i64,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub fallback_to_rule: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Canonical, normalized page of triage records.
///
/// Both recognized server response shapes (bare array and envelope object)
/// reduce to this form. `page`/`page_size` are present only when the server
/// reported them back, which may differ from what was requested.
#[derive(Debug, Clone, Default)]
pub struct SessionPage {
    pub items: Vec<TriageRecord>,
    pub total: u64,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SessionPage {
    /// A single exhausted page, as produced from a legacy bare-array
    /// response. The requested page/page_size are deliberately not echoed.
    pub fn exhausted(items: Vec<TriageRecord>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            page: None,
            page_size: None,
        }
    }
}
