use std::sync::Arc;

use crate::error::StreamsError;
use crate::storage::KeyValueStore;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Persistence for the access/refresh token pair.
///
/// Both keys are always written and removed together in one batched call.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub async fn store_tokens(&self, access: &str, refresh: &str) -> Result<(), StreamsError> {
        self.storage
            .multi_set(&[(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)])
            .await
    }

    /// Return the access token, or clear any partial state and fail with
    /// [`StreamsError::AuthRequired`] when there is none.
    pub async fn get_access_token(&self) -> Result<String, StreamsError> {
        match self.storage.get(ACCESS_TOKEN_KEY).await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                self.clear_tokens().await?;
                Err(StreamsError::AuthRequired)
            }
            Err(e) => {
                let _ = self.clear_tokens().await;
                Err(e)
            }
        }
    }

    /// Current access token without the missing-token cleanup.
    pub async fn peek_access_token(&self) -> Result<Option<String>, StreamsError> {
        self.storage.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn get_refresh_token(&self) -> Result<Option<String>, StreamsError> {
        self.storage.get(REFRESH_TOKEN_KEY).await
    }

    pub async fn clear_tokens(&self) -> Result<(), StreamsError> {
        self.storage
            .multi_remove(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
    }

    pub async fn has_session(&self) -> bool {
        self.get_access_token().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, TokenStore) {
        let mem = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(mem.clone());
        (mem, tokens)
    }

    async fn pair_state(mem: &MemoryStore) -> (bool, bool) {
        (
            mem.get(ACCESS_TOKEN_KEY).await.unwrap().is_some(),
            mem.get(REFRESH_TOKEN_KEY).await.unwrap().is_some(),
        )
    }

    #[tokio::test]
    async fn store_then_get_then_clear() {
        let (_, tokens) = store();
        tokens.store_tokens("A1", "R1").await.unwrap();
        assert_eq!(tokens.get_access_token().await.unwrap(), "A1");

        tokens.clear_tokens().await.unwrap();
        let err = tokens.get_access_token().await.unwrap_err();
        assert!(matches!(err, StreamsError::AuthRequired));
    }

    #[tokio::test]
    async fn store_overwrites_previous_pair() {
        let (_, tokens) = store();
        tokens.store_tokens("A1", "R1").await.unwrap();
        tokens.store_tokens("A2", "R2").await.unwrap();
        assert_eq!(tokens.get_access_token().await.unwrap(), "A2");
        assert_eq!(tokens.get_refresh_token().await.unwrap().as_deref(), Some("R2"));
    }

    #[tokio::test]
    async fn no_format_validation() {
        let (_, tokens) = store();
        tokens.store_tokens("", "not a jwt").await.unwrap();
        assert_eq!(tokens.get_access_token().await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_access_token_clears_partial_state() {
        let (mem, tokens) = store();
        mem.set(REFRESH_TOKEN_KEY, "orphan").await.unwrap();

        let err = tokens.get_access_token().await.unwrap_err();
        assert!(matches!(err, StreamsError::AuthRequired));
        assert_eq!(pair_state(&mem).await, (false, false));
    }

    #[tokio::test]
    async fn pair_is_never_split_by_store_or_clear() {
        let (mem, tokens) = store();
        let ops: [Option<(&str, &str)>; 6] = [
            Some(("A1", "R1")),
            None,
            None,
            Some(("A2", "R2")),
            Some(("A3", "R3")),
            None,
        ];
        for op in ops {
            match op {
                Some((a, r)) => tokens.store_tokens(a, r).await.unwrap(),
                None => tokens.clear_tokens().await.unwrap(),
            }
            let (access, refresh) = pair_state(&mem).await;
            assert_eq!(access, refresh);
        }
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (mem, tokens) = store();
        tokens.clear_tokens().await.unwrap();
        tokens.clear_tokens().await.unwrap();
        assert!(mem.is_empty().await);
    }

    #[tokio::test]
    async fn has_session_reflects_access_token() {
        let (_, tokens) = store();
        assert!(!tokens.has_session().await);
        tokens.store_tokens("A1", "R1").await.unwrap();
        assert!(tokens.has_session().await);
    }
}
