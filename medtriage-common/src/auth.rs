//! Auth request/response payloads and identity types.

use serde::{Deserialize, Serialize};

/// Role reported by the profile endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// `POST /auth/login` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// `POST /auth/login` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /auth/register` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// `GET /auth/profile` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /admin/users` response body - aggregate user count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersTotal {
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_lowercase() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert!(!role.is_admin());
    }

    #[test]
    fn test_profile_defaults_role_to_user() {
        let profile: Profile =
            serde_json::from_str(r#"{"username": "john", "email": "j@demo.com"}"#).unwrap();
        assert_eq!(profile.role, Role::User);
    }

    #[test]
    fn test_token_response_ignores_extra_fields() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        assert_eq!(body.access_token, "abc");
    }
}
