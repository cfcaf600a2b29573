//! Admin dashboard view state.
//!
//! Composes the paginated fetcher, the analytics aggregator, the audit log
//! and the CSV export into the single shared state the admin screens bind
//! to. Fetch errors never escape: they land in `last_error` as a display
//! string and the user re-triggers the fetch manually.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use medtriage_common::{RiskFilter, TriageRecord};

use crate::analytics::{AnalyticsSnapshot, AuditLog, AuditLogEntry, AuditStats};
use crate::api::SessionFetcher;
use crate::error::ApiError;
use crate::export;

/// Pagination and filter state for the sessions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based page number, never exceeding [`PageState::max_page`] once
    /// the total is known.
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub filter: RiskFilter,
}

impl PageState {
    pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

    pub fn max_page(&self) -> u32 {
        let pages = self.total.div_ceil(self.page_size as u64).max(1);
        pages.min(u32::MAX as u64) as u32
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.max_page()
    }

    fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.max_page());
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            total: 0,
            filter: RiskFilter::All,
        }
    }
}

#[derive(Default)]
struct ViewState {
    page: PageState,
    batch: Vec<TriageRecord>,
    analytics: AnalyticsSnapshot,
    audit: AuditLog,
    last_error: Option<String>,
}

/// Shared state behind the admin dashboard and sessions table.
///
/// Concurrent refreshes are resolved with a generation counter: each
/// refresh bumps the counter before issuing its request and a response is
/// discarded when a newer refresh started meanwhile, so the newest request
/// wins rather than the last response to arrive.
pub struct Dashboard {
    fetcher: Arc<dyn SessionFetcher>,
    state: RwLock<ViewState>,
    generation: AtomicU64,
}

impl Dashboard {
    pub fn new(fetcher: Arc<dyn SessionFetcher>) -> Self {
        let mut state = ViewState::default();
        state.audit.record("Admin logged in", None);
        Self {
            fetcher,
            state: RwLock::new(state),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn page_state(&self) -> PageState {
        self.state.read().await.page
    }

    pub async fn batch(&self) -> Vec<TriageRecord> {
        self.state.read().await.batch.clone()
    }

    pub async fn analytics(&self) -> AnalyticsSnapshot {
        self.state.read().await.analytics
    }

    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.state.read().await.audit.entries().to_vec()
    }

    pub async fn audit_stats(&self) -> AuditStats {
        self.state.read().await.audit.stats()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Change the risk filter; resets to page 1.
    pub async fn set_filter(&self, filter: RiskFilter) {
        let mut state = self.state.write().await;
        state.page.filter = filter;
        state.page.page = 1;
    }

    /// Change the page size; resets to page 1. Sizes outside the allowed
    /// set are refused.
    pub async fn set_page_size(&self, page_size: u32) -> bool {
        if !PageState::PAGE_SIZES.contains(&page_size) {
            tracing::warn!("Rejected page size {}", page_size);
            return false;
        }
        let mut state = self.state.write().await;
        state.page.page_size = page_size;
        state.page.page = 1;
        true
    }

    /// Move to the next page, clamped at the last known page.
    pub async fn next_page(&self) -> bool {
        let mut state = self.state.write().await;
        if state.page.has_next() {
            state.page.page += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page, clamped at page 1.
    pub async fn prev_page(&self) -> bool {
        let mut state = self.state.write().await;
        if state.page.has_prev() {
            state.page.page -= 1;
            true
        } else {
            false
        }
    }

    /// Fetch the current page and recompute analytics from the batch.
    ///
    /// Returns `false` when the response was superseded by a newer refresh
    /// and discarded. Errors are folded into `last_error`; a malformed
    /// response additionally degrades the view to an empty batch.
    pub async fn refresh(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (page, page_size, filter) = {
            let state = self.state.read().await;
            (state.page.page, state.page.page_size, state.page.filter)
        };

        let result = self.fetcher.fetch_page(page, page_size, filter).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded fetch (generation {})", generation);
            return false;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(fetched) => {
                state.page.total = fetched.total;
                if let Some(server_page) = fetched.page {
                    state.page.page = server_page.max(1);
                }
                if let Some(server_size) = fetched.page_size {
                    if PageState::PAGE_SIZES.contains(&server_size) {
                        state.page.page_size = server_size;
                    }
                }
                state.page.clamp();
                state.batch = fetched.items;
                state.analytics = AnalyticsSnapshot::from_page(
                    &state.batch,
                    fetched.total,
                    state.analytics.total_users,
                );
                state.last_error = None;
            }
            Err(err) => {
                tracing::warn!("Sessions fetch failed: {}", err);
                state.last_error = Some(err.user_message());
                if matches!(err, ApiError::MalformedResponse(_)) {
                    state.batch.clear();
                    state.page.total = 0;
                    state.page.clamp();
                    state.analytics =
                        AnalyticsSnapshot::from_page(&[], 0, state.analytics.total_users);
                }
            }
        }
        true
    }

    /// Merge the independently-sourced user count into the snapshot.
    /// Failures are ignored; the figure just stays stale.
    pub async fn refresh_user_count(&self) {
        match self.fetcher.user_count().await {
            Ok(total_users) => {
                let mut state = self.state.write().await;
                state.analytics = state.analytics.with_total_users(total_users);
            }
            Err(err) => {
                tracing::debug!("User count fetch failed: {}", err);
            }
        }
    }

    /// Encode the current batch as CSV and record the export in the audit
    /// log. Returns `None` when there is nothing to export.
    pub async fn export_csv(&self) -> Option<(String, String)> {
        let mut state = self.state.write().await;
        if state.batch.is_empty() {
            return None;
        }
        let text = export::encode_default(&state.batch);
        state.audit.record("Admin exported CSV", None);
        Some((export::EXPORT_FILE_NAME.to_string(), text))
    }
}
