//! Triage submission payloads.

use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;

/// `POST /triage` request body - free-text symptom description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRequest {
    pub symptom: String,
}

/// `POST /triage` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageResponse {
    pub risk: RiskLevel,
    pub suggestion: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub matches: Option<Vec<String>>,
    /// Present when the server persisted the assessment as a session.
    #[serde(default)]
    pub session_id: Option<i64>,
}

/// `POST /triage_heart` request body - structured clinical fields.
///
/// Field names follow the heart-disease dataset the server's model was
/// trained on (resting blood pressure, cholesterol, max heart rate, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartTriageRequest {
    pub age: u32,
    pub sex: u8,
    pub cp: u8,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: u8,
    pub thalach: u32,
    pub exang: u8,
    pub oldpeak: f64,
}

/// `POST /triage_heart` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartTriageResponse {
    pub prediction: i64,
    pub confidence: f64,
    #[serde(default)]
    pub important_features: Vec<String>,
}
