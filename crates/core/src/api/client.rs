use std::{sync::Arc, time::Duration};

use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;
use crate::config::ApiConfig;

/// Thin wrapper around `reqwest` bound to one backend origin.
///
/// Cloning is cheap; clones share the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    http: Client,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(&config.base_url, http))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: base_url.trim_end_matches('/').to_string(),
                http,
                token: RwLock::new(None),
            }),
        }
    }

    /// Backend origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Attach a bearer token to subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.inner.token.write() = Some(token.into());
    }

    /// Stop sending a bearer token.
    pub fn clear_token(&self) {
        *self.inner.token.write() = None;
    }

    /// Whether a bearer token is currently set.
    pub fn has_token(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|err| ApiError::InvalidUrl {
            url: joined,
            reason: err.to_string(),
        })
    }

    /// GET `path` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?;
        decode(&self.send(request, path).await?)
    }

    /// GET `path` with a per-request timeout overriding the client default.
    pub async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?.timeout(timeout);
        decode(&self.send(request, path).await?)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        decode(&self.send(request, path).await?)
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, path).await?;
        Ok(())
    }

    /// POST a JSON body and keep whatever comes back.
    ///
    /// JSON responses decode as-is, empty bodies become `null` and any other
    /// text is returned as a JSON string.
    pub async fn post_value<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        let body = self.send(request, path).await?;
        Ok(decode::<Value>(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned())))
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        decode(&self.send(request, path).await?)
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.send(request, path).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut request = self.inner.http.request(method, url);
        if let Some(token) = self.inner.token.read().as_deref() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "backend response");
        if !status.is_success() {
            let err = ApiError::from_body(status.as_u16(), &body);
            warn!(path, status = status.as_u16(), "backend rejected request: {err}");
            return Err(err);
        }
        Ok(body.to_vec())
    }
}

/// Empty bodies decode as JSON `null`.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(body)?)
}
