//! Typed client for the MedTriage HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use medtriage_common::{
    HeartTriageRequest, HeartTriageResponse, LoginRequest, Profile, RegisterRequest,
    RegisterResponse, RiskFilter, SessionPage, TokenResponse, TriageRequest, TriageResponse,
    UsersTotal,
};

use crate::error::{ApiError, Result};
use crate::store::{AdminCredential, CredentialKind, CredentialStore};

use super::normalize::{normalize, ListingBody};

/// Contract for requesting a page of remote triage records with a filter.
///
/// The dashboard is written against this seam so tests can drive it with a
/// scripted double instead of a live server.
#[async_trait]
pub trait SessionFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        filter: RiskFilter,
    ) -> Result<SessionPage>;

    /// Aggregate user count, sourced independently of the record pages.
    async fn user_count(&self) -> Result<u64>;
}

/// Client for the remote triage API.
///
/// Requests are fire-and-forget: no timeout, no de-duplication, no retry.
/// Ordering between concurrent requests is the caller's concern (see the
/// dashboard's generation counter).
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored user bearer token when one exists. Storage
    /// failures behave as if no credential were present.
    fn with_user_bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.get(CredentialKind::User) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Attach the stored admin credential under its own header rule.
    /// Exactly one of `Authorization` / `X-Admin-Token` is ever sent.
    fn with_admin_credential(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match AdminCredential::load(self.store.as_ref()) {
            Some(credential) => credential.apply(request),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }
        let text = response.text().await.map_err(ApiError::transport)?;
        serde_json::from_str(&text).map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }

    /// `POST /auth/login` - exchange credentials for a bearer token.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        Self::decode(response).await
    }

    /// `POST /auth/register` - create an account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        Self::decode(response).await
    }

    /// `GET /auth/profile` - resolve identity and role for a token.
    pub async fn profile(&self, token: &str) -> Result<Profile> {
        let response = self
            .http_client
            .get(self.url("/auth/profile"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::transport)?;
        Self::decode(response).await
    }

    /// `GET /auth/sessions` - the current user's own triage records.
    /// The endpoint answers with a bare array; it goes through the same
    /// normalization path as the admin listing.
    pub async fn my_sessions(&self) -> Result<SessionPage> {
        let request = self.http_client.get(self.url("/auth/sessions"));
        let response = self
            .with_user_bearer(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        let body: ListingBody = Self::decode(response).await?;
        normalize(body)
    }

    /// `GET /admin/sessions` - paginated, filterable triage records.
    pub async fn admin_sessions(
        &self,
        page: u32,
        page_size: u32,
        filter: RiskFilter,
    ) -> Result<SessionPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(risk) = filter.as_param() {
            query.push(("risk", risk.to_string()));
        }

        let request = self
            .http_client
            .get(self.url("/admin/sessions"))
            .query(&query);
        let response = self
            .with_admin_credential(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        let body: ListingBody = Self::decode(response).await?;
        normalize(body)
    }

    /// `GET /admin/users` - aggregate user count.
    pub async fn user_count(&self) -> Result<u64> {
        let request = self.http_client.get(self.url("/admin/users"));
        let response = self
            .with_admin_credential(request)
            .send()
            .await
            .map_err(ApiError::transport)?;
        let body: UsersTotal = Self::decode(response).await?;
        Ok(body.total)
    }

    /// `POST /triage` - submit symptom text, receive a risk assessment.
    /// The bearer token is optional; anonymous submissions are accepted.
    pub async fn submit_triage(&self, request: &TriageRequest) -> Result<TriageResponse> {
        let builder = self.http_client.post(self.url("/triage")).json(request);
        let response = self
            .with_user_bearer(builder)
            .send()
            .await
            .map_err(ApiError::transport)?;
        Self::decode(response).await
    }

    /// `POST /triage_heart` - submit structured clinical fields.
    pub async fn submit_heart_triage(
        &self,
        request: &HeartTriageRequest,
    ) -> Result<HeartTriageResponse> {
        let builder = self
            .http_client
            .post(self.url("/triage_heart"))
            .json(request);
        let response = self
            .with_user_bearer(builder)
            .send()
            .await
            .map_err(ApiError::transport)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl SessionFetcher for ApiClient {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        filter: RiskFilter,
    ) -> Result<SessionPage> {
        self.admin_sessions(page, page_size, filter).await
    }

    async fn user_count(&self) -> Result<u64> {
        ApiClient::user_count(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let store = Arc::new(MemoryCredentialStore::new());
        let client = ApiClient::new("http://127.0.0.1:8000/", store);
        assert_eq!(client.url("/auth/profile"), "http://127.0.0.1:8000/auth/profile");
    }
}
