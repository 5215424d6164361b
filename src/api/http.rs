//! REST client for the content backend.
//!
//! Wraps the backend's HTTP API (auth, blog, projects, CV showcase, contact,
//! security) using [`reqwest`]. One client is shared for connection pooling.

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use super::{ApiResult, FormPayload, PortfolioApi};
use crate::{
    error::ApiError,
    models::{
        AuthResponse, Blog, ContactMessage, ContactSubmission, Credentials, CvShowcase, ListQuery,
        Paginated, PasswordChangeForm, Project, ProjectCategory, SignupForm, UserProfile,
    },
};

/// HTTP client for one backend instance.
#[derive(Clone)]
pub struct HttpPortfolioApi {
    client: reqwest::Client,
    base_url: String,
}

/// Some endpoints wrap their payload as `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

impl HttpPortfolioApi {
    /// Create a client for the backend at `base_url`, e.g. `http://host:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        Self::check_status(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice::<Envelope<T>>(&body)
            .map(Envelope::into_inner)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like `fetch`, without unwrapping a `data` envelope. Used for lists,
    /// whose envelope also carries paging fields.
    async fn fetch_raw<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn submit_multipart<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        payload: FormPayload,
    ) -> ApiResult<T> {
        let form = payload.into_multipart()?;
        self.fetch(request.multipart(form)).await
    }

    /// Map non-2xx responses to `ApiError`. The backend message is taken from
    /// a JSON `message` or `error` field when there is one.
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: extract_message(&body)
                        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
                })
            }
        }
    }
}

/// Percent-encodes an identifier for use as one path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// Longest raw error body shown in a banner before it is cut short.
const MAX_MESSAGE_CHARS: usize = 300;

/// Best human-readable message in an error body.
pub fn extract_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            match json.get(key) {
                Some(serde_json::Value::String(text)) if !text.is_empty() => {
                    return Some(text.clone());
                }
                Some(serde_json::Value::Array(items)) => {
                    let joined: Vec<&str> = items.iter().filter_map(|i| i.as_str()).collect();
                    if !joined.is_empty() {
                        return Some(joined.join(" "));
                    }
                }
                _ => {}
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => Some(format!("{}…", trimmed[..cut].trim_end())),
        None => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.fetch(self.client.post(self.url("/auth/login")).json(credentials))
            .await
    }

    async fn signup(&self, form: &SignupForm) -> ApiResult<AuthResponse> {
        self.fetch(self.client.post(self.url("/auth/signup")).json(form))
            .await
    }

    async fn list_blogs(&self, query: &ListQuery) -> ApiResult<Paginated<Blog>> {
        self.fetch_raw(self.client.get(self.url("/api/blog")).query(query))
            .await
    }

    async fn get_blog(&self, id: &str) -> ApiResult<Blog> {
        self.fetch(self.client.get(self.url(&format!("/api/blog/{}", segment(id)))))
            .await
    }

    async fn create_blog(&self, token: &str, payload: FormPayload) -> ApiResult<Blog> {
        let request = self.client.post(self.url("/api/blog")).bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn update_blog(&self, token: &str, id: &str, payload: FormPayload) -> ApiResult<Blog> {
        let request = self
            .client
            .put(self.url(&format!("/api/blog/{}", segment(id))))
            .bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn delete_blog(&self, token: &str, id: &str) -> ApiResult<()> {
        self.send(
            self.client
                .delete(self.url(&format!("/api/blog/{}", segment(id))))
                .bearer_auth(token),
        )
        .await
        .map(|_| ())
    }

    async fn list_projects(&self, query: &ListQuery) -> ApiResult<Paginated<Project>> {
        self.fetch_raw(self.client.get(self.url("/api/projects")).query(query))
            .await
    }

    async fn get_project(&self, id: &str) -> ApiResult<Project> {
        self.fetch(self.client.get(self.url(&format!("/api/projects/{}", segment(id)))))
            .await
    }

    async fn list_categories(&self) -> ApiResult<Vec<ProjectCategory>> {
        self.fetch(self.client.get(self.url("/api/projects/categories")))
            .await
    }

    async fn create_project(&self, token: &str, payload: FormPayload) -> ApiResult<Project> {
        let request = self.client.post(self.url("/api/projects")).bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn update_project(
        &self,
        token: &str,
        id: &str,
        payload: FormPayload,
    ) -> ApiResult<Project> {
        let request = self
            .client
            .put(self.url(&format!("/api/projects/{}", segment(id))))
            .bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn delete_project(&self, token: &str, id: &str) -> ApiResult<()> {
        self.send(
            self.client
                .delete(self.url(&format!("/api/projects/{}", segment(id))))
                .bearer_auth(token),
        )
        .await
        .map(|_| ())
    }

    async fn get_cv_showcase(&self) -> ApiResult<Option<CvShowcase>> {
        match self.fetch(self.client.get(self.url("/api/cv-showcase"))).await {
            Ok(cv) => Ok(Some(cv)),
            Err(ApiError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_cv_showcase(&self, token: &str, payload: FormPayload) -> ApiResult<CvShowcase> {
        let request = self
            .client
            .put(self.url("/api/cv-showcase"))
            .bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn submit_contact(&self, submission: &ContactSubmission) -> ApiResult<()> {
        self.send(self.client.post(self.url("/api/contact")).json(submission))
            .await
            .map(|_| ())
    }

    async fn list_messages(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> ApiResult<Paginated<ContactMessage>> {
        self.fetch_raw(
            self.client
                .get(self.url("/api/contact"))
                .query(query)
                .bearer_auth(token),
        )
        .await
    }

    async fn mark_message_read(&self, token: &str, id: &str) -> ApiResult<()> {
        self.send(
            self.client
                .patch(self.url(&format!("/api/contact/{}/read", segment(id))))
                .bearer_auth(token),
        )
        .await
        .map(|_| ())
    }

    async fn delete_message(&self, token: &str, id: &str) -> ApiResult<()> {
        self.send(
            self.client
                .delete(self.url(&format!("/api/contact/{}", segment(id))))
                .bearer_auth(token),
        )
        .await
        .map(|_| ())
    }

    async fn get_profile(&self, token: &str) -> ApiResult<UserProfile> {
        self.fetch(
            self.client
                .get(self.url("/api/security/profile"))
                .bearer_auth(token),
        )
        .await
    }

    async fn update_profile(&self, token: &str, payload: FormPayload) -> ApiResult<UserProfile> {
        let request = self
            .client
            .put(self.url("/api/security/profile"))
            .bearer_auth(token);
        self.submit_multipart(request, payload).await
    }

    async fn change_password(&self, token: &str, form: &PasswordChangeForm) -> ApiResult<()> {
        self.send(
            self.client
                .post(self.url("/api/security/password"))
                .bearer_auth(token)
                .json(form),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_json_fields() {
        assert_eq!(
            extract_message(r#"{"message":"Title already used"}"#).as_deref(),
            Some("Title already used")
        );
        assert_eq!(
            extract_message(r#"{"error":["a","b"]}"#).as_deref(),
            Some("a b")
        );
        assert_eq!(extract_message("plain failure").as_deref(), Some("plain failure"));
        assert_eq!(extract_message("   "), None);
    }

    #[test]
    fn long_plain_bodies_are_truncated() {
        let body = "é".repeat(400);
        let message = extract_message(&body).unwrap();
        assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS + 1);
        assert!(message.starts_with("éé"));
        assert!(message.ends_with('…'));

        let exact = "x".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(extract_message(&exact), Some(exact));
    }
}
