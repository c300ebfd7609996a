use reqwest::Method;
use serde_json::json;

use crate::auth::LoginResponse;
use crate::error::StreamsError;

use super::request::{ApiRequest, FormData};
use super::{decode_payload, ApiClient};

impl ApiClient {
    /// Obtain a token pair for `username` and persist it.
    ///
    /// Returns the raw login response. On failure the backend or transport
    /// error is returned unchanged and storage is not touched.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<serde_json::Value, StreamsError> {
        let req = ApiRequest::new(Method::POST, "/auth/token/")
            .body(json!({ "username": username, "password": password }));
        let bytes = self.fetch_bytes(&req).await.map_err(|e| {
            tracing::error!("Login error: {e}");
            e
        })?;

        let raw = decode_payload(&bytes);
        let tokens = LoginResponse::from_value(&raw)?;
        self.tokens()
            .store_tokens(&tokens.access, &tokens.refresh)
            .await?;
        tracing::debug!("Logged in as {username}");
        Ok(raw)
    }

    /// Forget the stored session. No backend call; safe to repeat.
    pub async fn logout(&self) -> Result<(), StreamsError> {
        self.tokens().clear_tokens().await
    }

    /// Create an account. Unauthenticated; does not log in.
    pub async fn signup(&self, form: FormData) -> Result<serde_json::Value, StreamsError> {
        let req = ApiRequest::new(Method::POST, "/auth/signup/").body(form);
        let bytes = self.fetch_bytes(&req).await.map_err(|e| {
            tracing::error!("Signup error: {e}");
            e
        })?;
        Ok(decode_payload(&bytes))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens().has_session().await
    }

    /// Profile of the logged-in user with `id` normalized from `user_id`.
    pub async fn current_user(&self) -> Result<serde_json::Value, StreamsError> {
        let mut profile = self.get("/profiles/me/").await?;
        normalize_user_id(&mut profile);
        Ok(profile)
    }
}

/// `id = user_id || id || null`, treating falsy JSON values as absent.
pub(crate) fn normalize_user_id(profile: &mut serde_json::Value) {
    let Some(obj) = profile.as_object_mut() else {
        return;
    };
    let id = [obj.get("user_id"), obj.get("id")]
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v))
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    obj.insert("id".to_string(), id);
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_wins_over_id() {
        let mut p = json!({"id": 3, "user_id": 9, "bio": "choir"});
        normalize_user_id(&mut p);
        assert_eq!(p["id"], 9);
    }

    #[test]
    fn falls_back_to_id() {
        let mut p = json!({"id": 3, "user_id": null});
        normalize_user_id(&mut p);
        assert_eq!(p["id"], 3);
    }

    #[test]
    fn missing_both_is_null() {
        let mut p = json!({"bio": "x"});
        normalize_user_id(&mut p);
        assert!(p["id"].is_null());
    }

    #[test]
    fn non_object_untouched() {
        let mut p = json!([1, 2]);
        normalize_user_id(&mut p);
        assert_eq!(p, json!([1, 2]));
    }
}
