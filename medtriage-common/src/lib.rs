//! MedTriage Common Types
//!
//! Shared types used by the client core and any UI shell embedding it.

pub mod auth;
pub mod record;
pub mod risk;
pub mod triage;

pub use auth::{
    LoginRequest, Profile, RegisterRequest, RegisterResponse, Role, TokenResponse, UsersTotal,
};
pub use record::{RecordAudit, RecordUser, SessionPage, TriageRecord};
pub use risk::{RiskFilter, RiskLevel};
pub use triage::{HeartTriageRequest, HeartTriageResponse, TriageRequest, TriageResponse};
