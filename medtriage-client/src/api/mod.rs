//! HTTP client for the remote triage API.
//!
//! One configured origin serves auth, triage submission, and the admin
//! listings. Response-shape normalization happens once at this boundary;
//! everything above sees the canonical [`medtriage_common::SessionPage`].

mod client;
mod normalize;

pub use client::{ApiClient, SessionFetcher};
