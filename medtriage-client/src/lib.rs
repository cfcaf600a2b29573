//! MedTriage client core.
//!
//! The shared, view-independent half of the MedTriage frontend: credential
//! persistence, session lifecycle, the paginated/filterable record view over
//! the remote triage API, analytics derived from fetched batches, and CSV
//! export. UI shells (desktop, TUI, web) compose these pieces; everything
//! here is presentation-free.

pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod export;
pub mod logging;
pub mod session;
pub mod store;

pub use analytics::{AnalyticsSnapshot, AuditLog, AuditLogEntry, AuditStats};
pub use api::{ApiClient, SessionFetcher};
pub use config::Config;
pub use dashboard::{Dashboard, PageState};
pub use error::{ApiError, Result};
pub use events::{AuthEvent, AuthEvents};
pub use export::{encode, encode_default, ExportColumn, EXPORT_COLUMNS, EXPORT_FILE_NAME};
pub use session::{Route, SessionIdentity, SessionManager, SessionState};
pub use store::{
    AdminCredential, CredentialKind, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
