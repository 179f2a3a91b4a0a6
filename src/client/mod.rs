//! Typed HTTP client for the Journal Borrowing API

pub mod envelope;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
};

use self::envelope::{error_message, Envelope};

/// Credentials attached to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub bearer: Option<String>,
    pub cookie: Option<String>,
}

/// Shared API client.
///
/// Cloning is cheap; clones share the connection pool and credentials.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<RwLock<Credentials>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json;charset=utf-8"));

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Arc::new(RwLock::new(Credentials::default())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    pub async fn set_credentials(&self, credentials: Credentials) {
        *self.credentials.write().await = credentials;
    }

    pub async fn clear_credentials(&self) {
        *self.credentials.write().await = Credentials::default();
    }

    // -----------------------------------------------------------------------
    // Envelope requests
    // -----------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.request(Method::GET, path).await;
        self.call(request).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).await.query(query);
        self.call(request).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).await.json(body);
        self.call(request).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path).await.json(body);
        self.call(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.request(Method::DELETE, path).await;
        self.call(request).await
    }

    /// Download a binary payload (no envelope)
    pub async fn download(&self, path: &str) -> AppResult<Vec<u8>> {
        let request = self.request(Method::GET, path).await;
        let response = self.send(request).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        let bytes = response.bytes().await?;

        // An export that failed server-side comes back as an envelope
        if is_json {
            let body = String::from_utf8_lossy(&bytes);
            Envelope::parse(&body)?.into_data::<serde::de::IgnoredAny>()?;
        }
        Ok(bytes.to_vec())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let credentials = self.credentials.read().await;
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = &credentials.bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = &credentials.cookie {
            request = request.header(COOKIE, cookie.as_str());
        }
        request
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        Envelope::parse(&body)?.into_data()
    }

    /// Send, capture cookies and map non-2xx statuses
    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "API request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::error!(%method, %url, error = %e, "API request failed");
            AppError::from(e)
        })?;

        self.capture_cookies(&response).await;

        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "API response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::http(status.as_u16(), error_message(&body)));
        }
        Ok(response)
    }

    async fn capture_cookies(&self, response: &Response) {
        let pairs: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if pairs.is_empty() {
            return;
        }
        let mut credentials = self.credentials.write().await;
        credentials.cookie = Some(merge_cookies(credentials.cookie.as_deref(), &pairs));
    }
}

/// Merge `name=value` pairs into a cookie header, newer values winning
fn merge_cookies(existing: Option<&str>, pairs: &[&str]) -> String {
    let mut jar: indexmap::IndexMap<String, String> = indexmap::IndexMap::new();
    let existing = existing
        .map(|c| c.split(';').map(str::trim).filter(|p| !p.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default();
    for pair in existing.iter().chain(pairs.iter()).copied() {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        jar.insert(name.trim().to_string(), value.trim().to_string());
    }
    jar.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/api/".into(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/journal/journals"), "http://localhost:8080/api/journal/journals");
        assert_eq!(client.url("auth/logout"), "http://localhost:8080/api/auth/logout");
    }

    #[test]
    fn test_merge_cookies() {
        assert_eq!(merge_cookies(None, &["JSESSIONID=abc"]), "JSESSIONID=abc");
        assert_eq!(
            merge_cookies(Some("JSESSIONID=abc; lang=en"), &["JSESSIONID=def"]),
            "JSESSIONID=def; lang=en"
        );
    }

    #[tokio::test]
    async fn test_credentials_roundtrip() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        client
            .set_credentials(Credentials {
                bearer: Some("token".into()),
                cookie: None,
            })
            .await;
        assert_eq!(client.credentials().await.bearer.as_deref(), Some("token"));
        client.clear_credentials().await;
        assert_eq!(client.credentials().await, Credentials::default());
    }
}
