use crate::auth::TokenStore;
use crate::error::StreamsError;

/// Outbound hook that decides whether a URL needs a bearer token and
/// supplies it.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    api_url: String,
    auth_url: String,
    tokens: TokenStore,
}

impl AuthInterceptor {
    pub fn new(api_url: &str, auth_url: &str, tokens: TokenStore) -> Self {
        Self {
            api_url: api_url.to_string(),
            auth_url: auth_url.to_string(),
            tokens,
        }
    }

    /// URLs under the API base, except the auth sub-path, require a token.
    pub fn is_protected(&self, url: &str) -> bool {
        url.starts_with(&self.api_url) && !url.starts_with(&self.auth_url)
    }

    /// A 401 on this URL may be recovered by refreshing. The auth sub-path
    /// (which holds the refresh endpoint) is never eligible.
    pub fn is_refreshable(&self, url: &str) -> bool {
        self.is_protected(url)
    }

    /// Token to attach to a request for `url`, or `None` for pass-through.
    ///
    /// A protected URL without a stored token fails with
    /// [`StreamsError::AuthRequired`] before anything is sent, and the token
    /// store is cleared.
    pub async fn authorize(&self, url: &str) -> Result<Option<String>, StreamsError> {
        if !self.is_protected(url) {
            return Ok(None);
        }
        match self.tokens.get_access_token().await {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                tracing::debug!("No token for request {url}");
                Err(e)
            }
        }
    }
}
