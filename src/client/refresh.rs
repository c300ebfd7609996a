use std::time::Duration;

use tokio::sync::Mutex;

use crate::auth::{RefreshResponse, TokenStore};
use crate::error::StreamsError;

/// Upper bound on HTTP calls made by one refresh.
pub const MAX_REFRESH_ATTEMPTS: u32 = 2;

/// Exchanges the stored refresh token for a new access token.
///
/// Refreshes are serialized: a caller that was rejected with a token that has
/// since been replaced reuses the replacement instead of refreshing again.
#[derive(Debug)]
pub struct Refresher {
    http: reqwest::Client,
    tokens: TokenStore,
    refresh_url: String,
    timeout: Duration,
    in_flight: Mutex<()>,
}

impl Refresher {
    pub fn new(
        http: reqwest::Client,
        tokens: TokenStore,
        refresh_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            tokens,
            refresh_url,
            timeout,
            in_flight: Mutex::new(()),
        }
    }

    /// Unconditionally refresh the access token.
    pub async fn refresh_auth_token(&self) -> Result<String, StreamsError> {
        let _guard = self.in_flight.lock().await;
        self.refresh_locked().await
    }

    /// Recover from a 401 received while sending `rejected`.
    pub async fn refresh_after_rejection(
        &self,
        rejected: Option<&str>,
    ) -> Result<String, StreamsError> {
        let _guard = self.in_flight.lock().await;
        if let (Some(rejected), Some(current)) =
            (rejected, self.tokens.peek_access_token().await?)
        {
            if current != rejected {
                tracing::debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<String, StreamsError> {
        let Some(refresh) = self.tokens.get_refresh_token().await? else {
            tracing::debug!("No refresh token stored");
            self.tokens.clear_tokens().await?;
            return Err(StreamsError::SessionExpired);
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::debug!(attempt, "Refreshing access token");
            match self.request_access(&refresh).await {
                Ok(access) => {
                    self.tokens.store_tokens(&access, &refresh).await?;
                    return Ok(access);
                }
                Err(e) if attempt < MAX_REFRESH_ATTEMPTS => {
                    tracing::warn!(attempt, "Token refresh failed, retrying: {e}");
                }
                Err(e) => {
                    tracing::warn!(attempt, "Token refresh failed: {e}");
                    self.tokens.clear_tokens().await?;
                    return Err(StreamsError::SessionExpired);
                }
            }
        }
    }

    async fn request_access(&self, refresh: &str) -> Result<String, StreamsError> {
        let resp = self
            .http
            .post(&self.refresh_url)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .map_err(|e| StreamsError::Transport(Box::new(e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .bytes()
                .await
                .map_err(|e| StreamsError::Transport(Box::new(e.without_url())))?;
            return Err(StreamsError::Backend {
                status: status.as_u16(),
                payload: super::decode_payload(&body),
            });
        }

        let parsed: RefreshResponse = resp.json().await.map_err(|e| {
            StreamsError::Protocol(format!("Failed to parse token refresh response: {e}"))
        })?;
        parsed.into_access()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::storage::MemoryStore;

    fn refresher(refresh_url: String) -> Refresher {
        Refresher::new(
            reqwest::Client::new(),
            TokenStore::new(Arc::new(MemoryStore::new())),
            refresh_url,
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn rejected_refresh_keeps_backend_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/token/refresh/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;

        let r = refresher(format!("{}/api/auth/token/refresh/", server.uri()));
        let err = r.request_access("R1").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.payload().unwrap(), &serde_json::json!("expired"));
    }

    #[tokio::test]
    async fn truncated_error_body_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let r = refresher(format!("http://{addr}/api/auth/token/refresh/"));
        let err = r.request_access("R1").await.unwrap_err();
        assert_eq!(err.code(), "transport_error");
    }
}
