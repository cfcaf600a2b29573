//! Error types for the client core.

/// Errors surfaced by operations against the remote triage API.
///
/// Every variant is caught at the boundary of the operation that issued the
/// request and converted into a message held in view state; nothing here is
/// allowed to propagate as an unhandled failure. Nothing is retried
/// automatically - the user re-triggers the operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401 - credentials missing, expired, or rejected. Stored
    /// credentials are not cleared automatically; the server is the
    /// authority on expiry.
    #[error("Unauthorized: please login")]
    Unauthorized,

    /// HTTP 403 - authenticated but lacking privileges. Role-gated views
    /// should have redirected before this could be hit.
    #[error("Forbidden: insufficient privileges")]
    Forbidden,

    /// Network failure or a non-2xx status not covered above.
    #[error("Request failed{}", status.map(|s| format!(": status {s}")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Response body matched neither recognized shape. Consumers degrade to
    /// an empty batch rather than guessing at the structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Credential storage read/write failed. The affected feature behaves
    /// as if no credential were present.
    #[error("Storage access failed: {0}")]
    Storage(String),
}

impl ApiError {
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            code => ApiError::Transport {
                status: Some(code),
                message: format!("status {code}"),
            },
        }
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        ApiError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Message suitable for direct display in view state.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::FORBIDDEN),
            ApiError::Forbidden
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Transport {
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ApiError::Unauthorized.user_message(), "Unauthorized: please login");
        assert_eq!(
            ApiError::Forbidden.user_message(),
            "Forbidden: insufficient privileges"
        );
        let transport = ApiError::Transport {
            status: Some(502),
            message: "status 502".to_string(),
        };
        assert_eq!(transport.user_message(), "Request failed: status 502");
    }
}
