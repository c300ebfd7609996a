pub mod interceptor;
pub mod refresh;
pub mod request;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::error::StreamsError;
use crate::storage::{FileStore, KeyValueStore};

pub use interceptor::AuthInterceptor;
pub use refresh::{Refresher, MAX_REFRESH_ATTEMPTS};
pub use request::{ApiRequest, Attempt, FormData, FormValue, RequestBody, RequestOptions};

/// Authenticated client for the backend REST API.
///
/// Build one at startup and clone it into every call site; clones share the
/// HTTP connection pool, the token store and the refresh lock.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    tokens: TokenStore,
    interceptor: AuthInterceptor,
    refresher: Arc<Refresher>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, StreamsError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StreamsError::Transport(Box::new(e)))?;

        let tokens = TokenStore::new(storage);
        let interceptor = AuthInterceptor::new(&config.api_url(), &config.auth_url(), tokens.clone());
        let refresher = Refresher::new(
            http.clone(),
            tokens.clone(),
            format!("{}token/refresh/", config.auth_url()),
            config.refresh_timeout,
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            tokens,
            interceptor,
            refresher: Arc::new(refresher),
        })
    }

    /// Client persisting tokens in a [`FileStore`] at `config.storage_path`.
    pub fn from_config(config: ClientConfig) -> Result<Self, StreamsError> {
        let storage = Arc::new(FileStore::new(config.storage_path.clone()));
        Self::new(config, storage)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        self.tokens.storage()
    }

    /// Full URL for a path under `/api`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url(), path)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Makes at most [`MAX_REFRESH_ATTEMPTS`] calls; on failure both tokens
    /// are cleared and [`StreamsError::SessionExpired`] is returned.
    pub async fn refresh_auth_token(&self) -> Result<String, StreamsError> {
        self.refresher.refresh_auth_token().await
    }

    /// Send `req` through the auth interceptor, refreshing and resending
    /// once on a 401. Non-2xx responses are returned as-is.
    pub async fn execute(&self, req: &ApiRequest) -> Result<reqwest::Response, StreamsError> {
        let url = self.url_for(&req.path);
        let mut attempt = Attempt::Initial;
        loop {
            let token = self.interceptor.authorize(&url).await?;
            let response = self.send(req, &url, token.as_deref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED
                && attempt.may_refresh()
                && self.interceptor.is_refreshable(&url)
            {
                tracing::debug!("401 on {} {}, refreshing token", req.method, req.path);
                attempt = Attempt::Retry;
                self.refresher.refresh_after_rejection(token.as_deref()).await?;
                continue;
            }
            return Ok(response);
        }
    }

    async fn send(
        &self,
        req: &ApiRequest,
        url: &str,
        token: Option<&str>,
    ) -> Result<reqwest::Response, StreamsError> {
        let timeout = req.options.timeout.unwrap_or(self.config.request_timeout);
        let mut builder = self.http.request(req.method.clone(), url).timeout(timeout);

        builder = match &req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };
        builder = builder.headers(request_headers(req)?);
        if !req.options.query.is_empty() {
            builder = builder.query(&req.options.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder
            .send()
            .await
            .map_err(|e| transport_error(e, &req.method, &req.path, timeout))
    }

    /// Run `req` and return the body of a 2xx response; other statuses
    /// become [`StreamsError::Backend`] with the payload preserved.
    pub async fn fetch_bytes(&self, req: &ApiRequest) -> Result<Vec<u8>, StreamsError> {
        let response = self.execute(req).await?;
        let timeout = req.options.timeout.unwrap_or(self.config.request_timeout);
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, &req.method, &req.path, timeout))?;

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(StreamsError::Backend {
                status: status.as_u16(),
                payload: decode_payload(&bytes),
            })
        }
    }

    /// Generic request helper used by every endpoint function.
    ///
    /// Applies the helper timeout, then normalizes failures: a 401 that
    /// survived refresh (or a token-related transport failure) clears the
    /// session and becomes [`StreamsError::SessionExpired`]; timeouts and
    /// backend errors pass through unchanged.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<serde_json::Value, StreamsError> {
        let bytes = self.request_bytes(method, path, body, options).await?;
        Ok(decode_payload(&bytes))
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<T, StreamsError> {
        let value = self.request(method, path, body, options).await?;
        serde_json::from_value(value).map_err(|e| {
            StreamsError::Protocol(format!("Failed to decode response from {path}: {e}"))
        })
    }

    pub async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        mut options: RequestOptions,
    ) -> Result<Vec<u8>, StreamsError> {
        options.timeout.get_or_insert(self.config.helper_timeout);
        let req = ApiRequest::new(method, path).body(body).options(options);
        match self.fetch_bytes(&req).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(self.normalize_failure(&req, e).await),
        }
    }

    async fn normalize_failure(&self, req: &ApiRequest, err: StreamsError) -> StreamsError {
        match err.payload() {
            Some(payload) => tracing::error!("API Error [{} {}]: {payload}", req.method, req.path),
            None => tracing::error!("API Error [{} {}]: {err}", req.method, req.path),
        }

        let session_lost = match &err {
            StreamsError::Backend { status, .. } => *status == StatusCode::UNAUTHORIZED.as_u16(),
            StreamsError::Transport(source) => mentions_token(&error_chain(source.as_ref())),
            _ => false,
        };
        if !session_lost {
            return err;
        }
        if let Err(e) = self.tokens.clear_tokens().await {
            tracing::warn!("Failed to clear tokens: {e}");
        }
        StreamsError::SessionExpired
    }

    pub async fn get(&self, path: &str) -> Result<serde_json::Value, StreamsError> {
        self.request(Method::GET, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, StreamsError> {
        self.request(
            Method::GET,
            path,
            RequestBody::Empty,
            RequestOptions::new().query(params),
        )
        .await
    }

    pub async fn post(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
    ) -> Result<serde_json::Value, StreamsError> {
        self.request(Method::POST, path, body.into(), RequestOptions::default())
            .await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
    ) -> Result<serde_json::Value, StreamsError> {
        self.request(Method::PATCH, path, body.into(), RequestOptions::default())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, StreamsError> {
        self.request(Method::DELETE, path, RequestBody::Empty, RequestOptions::default())
            .await
    }
}

fn transport_error(
    e: reqwest::Error,
    method: &Method,
    path: &str,
    timeout: Duration,
) -> StreamsError {
    if e.is_timeout() {
        StreamsError::Timeout {
            method: method.to_string(),
            path: path.to_string(),
            duration: timeout,
        }
    } else {
        StreamsError::Transport(Box::new(e.without_url()))
    }
}

/// Headers for one send. Caller options replace the defaults rather than
/// adding a second value.
fn request_headers(req: &ApiRequest) -> Result<HeaderMap, StreamsError> {
    let mut headers = HeaderMap::new();
    if matches!(req.body, RequestBody::Empty) {
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    for (name, value) in &req.options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| StreamsError::Protocol(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| StreamsError::Protocol(format!("Invalid header value for '{name}': {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Messages of `err` and its sources, without any request URL.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// JSON when the body parses, the raw text otherwise, `null` when empty.
pub(crate) fn decode_payload(bytes: &[u8]) -> serde_json::Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

fn mentions_token(message: &str) -> bool {
    message.to_ascii_lowercase().contains("token")
}
