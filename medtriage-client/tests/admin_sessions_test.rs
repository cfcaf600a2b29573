//! Integration tests for the paginated sessions fetcher and the triage
//! submission endpoints against a mock server.

use std::sync::Arc;

use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medtriage_client::{ApiClient, ApiError, CredentialKind, CredentialStore, MemoryCredentialStore};
use medtriage_common::{HeartTriageRequest, RiskFilter, RiskLevel, TriageRequest};

/// Matches requests that do NOT carry the given header.
struct NoHeader(&'static str);

impl wiremock::Match for NoHeader {
    fn matches(&self, request: &wiremock::Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}

fn client(server: &MockServer) -> (Arc<MemoryCredentialStore>, ApiClient) {
    let store = Arc::new(MemoryCredentialStore::new());
    let api = ApiClient::new(&server.uri(), store.clone());
    (store, api)
}

fn session_item(id: i64, risk: &str) -> serde_json::Value {
    serde_json::json!({
        "session_id": id,
        "input_text": format!("symptoms {id}"),
        "risk_level": risk,
        "predicted_conditions": [],
        "next_step": "Telehealth consultation",
        "confidence_score": 0.5,
        "created_at": "2025-10-11T00:09:58"
    })
}

#[tokio::test]
async fn test_query_encodes_page_size_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .and(query_param("risk", "High"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [session_item(1, "high")],
            "total": 1,
            "page": 1,
            "page_size": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let page = api.admin_sessions(1, 10, RiskFilter::High).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_risk_param_omitted_for_all_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "50"))
        .and(query_param_is_missing("risk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [],
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    api.admin_sessions(2, 50, RiskFilter::All).await.unwrap();
}

#[tokio::test]
async fn test_bare_array_response_is_a_single_exhausted_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([session_item(1, "low"), session_item(2, "high")])),
        )
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let page = api.admin_sessions(1, 10, RiskFilter::All).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 2);
    assert!(page.page.is_none());
    assert!(page.page_size.is_none());
}

#[tokio::test]
async fn test_envelope_response_adopts_server_pagination() {
    let server = MockServer::start().await;
    let items: Vec<_> = (1..=5).map(|i| session_item(i, "medium")).collect();
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": items,
            "total": 42,
            "page": 3,
            "page_size": 5
        })))
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let page = api.admin_sessions(3, 5, RiskFilter::All).await.unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 42);
    assert_eq!(page.page, Some(3));
}

#[tokio::test]
async fn test_raw_admin_token_uses_x_admin_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .and(header("x-admin-token", "shared-secret"))
        .and(NoHeader("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (store, api) = client(&server);
    store.set(CredentialKind::Admin, "shared-secret");
    api.admin_sessions(1, 10, RiskFilter::All).await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_and_forbidden_are_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let err = api.admin_sessions(1, 10, RiskFilter::All).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    let err = api.admin_sessions(2, 10, RiskFilter::All).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));
}

#[tokio::test]
async fn test_unrecognized_body_is_malformed_not_a_crash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"sessions": [], "count": 3})),
        )
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let err = api.admin_sessions(1, 10, RiskFilter::All).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_user_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 17})))
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    assert_eq!(api.user_count().await.unwrap(), 17);
}

#[tokio::test]
async fn test_my_sessions_sends_bearer_and_normalizes_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/sessions"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([session_item(4, "low")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (store, api) = client(&server);
    store.set(CredentialKind::User, "tok-9");
    let page = api.my_sessions().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].session_id, 4);
}

#[tokio::test]
async fn test_anonymous_triage_submission_has_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/triage"))
        .and(NoHeader("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "risk": "High",
            "suggestion": "Visit ER immediately",
            "conditions": ["cardiac"],
            "score": 0.9,
            "matches": ["chest pain"],
            "session_id": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_, api) = client(&server);
    let response = api
        .submit_triage(&TriageRequest {
            symptom: "severe chest pain".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.risk, RiskLevel::High);
    assert_eq!(response.session_id, Some(12));
}

#[tokio::test]
async fn test_heart_triage_submission_attaches_stored_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/triage_heart"))
        .and(header("authorization", "Bearer tok-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prediction": 1,
            "confidence": 0.72,
            "important_features": ["cp", "oldpeak"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (store, api) = client(&server);
    store.set(CredentialKind::User, "tok-7");
    let response = api
        .submit_heart_triage(&HeartTriageRequest {
            age: 63,
            sex: 1,
            cp: 3,
            trestbps: 145,
            chol: 233,
            fbs: 1,
            thalach: 150,
            exang: 0,
            oldpeak: 2.3,
        })
        .await
        .unwrap();
    assert_eq!(response.prediction, 1);
    assert_eq!(response.important_features, vec!["cp", "oldpeak"]);
}
