//! Summary statistics over fetched record batches and the local audit log.
//!
//! Everything here is a pure function of its inputs: snapshots are
//! recomputed on every fetch and never persisted. The client only ever
//! sees one page (or an unpaginated legacy array), so batch-derived
//! figures describe the last-seen batch, not the full remote table.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use medtriage_common::TriageRecord;

/// Sentinel actor for audit entries recorded without one.
const DEFAULT_ACTOR: &str = "admin";

/// Dashboard headline figures.
///
/// `total_users` is sourced separately (from `/admin/users`) and merged in;
/// the rest derive from the last fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalyticsSnapshot {
    pub total_sessions: u64,
    pub high_risk: u64,
    /// Mean confidence over the batch, absent scores counted as 0,
    /// rounded to 2 decimals. 0 for an empty batch.
    pub avg_confidence: f64,
    pub total_users: u64,
}

impl AnalyticsSnapshot {
    /// Compute a snapshot from a fetched page.
    ///
    /// `total` is the server-reported record count (which may exceed the
    /// batch length under pagination). Must not fail on an empty batch.
    pub fn from_page(items: &[TriageRecord], total: u64, total_users: u64) -> Self {
        let high_risk = items.iter().filter(|r| r.risk_level.is_high()).count() as u64;

        let avg_confidence = if items.is_empty() {
            0.0
        } else {
            let sum: f64 = items.iter().map(|r| r.confidence_score.unwrap_or(0.0)).sum();
            round2(sum / items.len() as f64)
        };

        Self {
            total_sessions: total,
            high_risk,
            avg_confidence,
            total_users,
        }
    }

    pub fn with_total_users(mut self, total_users: u64) -> Self {
        self.total_users = total_users;
        self
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One client-local audit entry.
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
}

impl AuditLogEntry {
    pub fn new(text: impl Into<String>, actor: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            timestamp: Utc::now(),
            actor,
        }
    }
}

/// Append-only log of administrative actions, newest first, capped to the
/// most recent 50 entries. Held only in memory for the lifetime of the
/// view; the server never sees it.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    const CAP: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, text: impl Into<String>, actor: Option<String>) {
        self.entries.insert(0, AuditLogEntry::new(text, actor));
        self.entries.truncate(Self::CAP);
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats::from_entries(&self.entries)
    }
}

/// Figures derived from the audit log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditStats {
    pub total: u64,
    /// Entries whose text contains "export", case-insensitively.
    pub exports: u64,
    /// Distinct actors; entries without one count as the `"admin"` sentinel.
    pub unique_actors: u64,
    /// Timestamp of the most recent entry, absent when the log is empty.
    pub last: Option<DateTime<Utc>>,
}

impl AuditStats {
    pub fn from_entries(entries: &[AuditLogEntry]) -> Self {
        let exports = entries
            .iter()
            .filter(|e| e.text.to_lowercase().contains("export"))
            .count() as u64;

        let actors: HashSet<&str> = entries
            .iter()
            .map(|e| e.actor.as_deref().unwrap_or(DEFAULT_ACTOR))
            .collect();

        Self {
            total: entries.len() as u64,
            exports,
            unique_actors: actors.len() as u64,
            last: entries.iter().map(|e| e.timestamp).max(),
        }
    }
}
