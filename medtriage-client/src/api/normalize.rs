//! Normalization of the two recognized sessions-listing response shapes.

use serde::Deserialize;

use medtriage_common::{SessionPage, TriageRecord};

use crate::error::{ApiError, Result};

/// The remote listing endpoints answer in one of two incompatible shapes:
/// a paginated envelope, or a legacy bare array. Decoded once here as a
/// tagged union instead of shape-sniffing at each call site.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListingBody {
    Envelope {
        items: Vec<TriageRecord>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        page_size: Option<u32>,
    },
    List(Vec<TriageRecord>),
    Other(serde_json::Value),
}

/// Reduce a decoded listing body to the canonical page form.
///
/// A bare array is a single exhausted page: `total` is its length and the
/// requested page/page_size are left untouched. An envelope adopts the
/// server's `page`/`page_size` when present, since the server may have
/// normalized them differently than requested. Any other shape is refused
/// rather than guessed at; the consuming view degrades to an empty batch.
pub(crate) fn normalize(body: ListingBody) -> Result<SessionPage> {
    match body {
        ListingBody::Envelope {
            items,
            total,
            page,
            page_size,
        } => Ok(SessionPage {
            items,
            total: total.unwrap_or(0),
            page,
            page_size,
        }),
        ListingBody::List(items) => Ok(SessionPage::exhausted(items)),
        ListingBody::Other(value) => {
            tracing::warn!("Unrecognized sessions response shape: {}", value);
            Err(ApiError::MalformedResponse(
                "unrecognized response shape".to_string(),
            ))
        }
    }
}
