use serde::{Deserialize, Serialize};

use crate::error::StreamsError;

/// Token pair returned by `POST /auth/token/`.
///
/// The backend may add fields (user id, username); they are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LoginResponse {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, StreamsError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            StreamsError::Protocol(format!("Invalid login response: {e}"))
        })
    }
}

/// Body of `POST /auth/token/refresh/`. Only `access` is used; a rotated
/// refresh token, if the backend sends one, is ignored.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
}

impl RefreshResponse {
    pub fn into_access(self) -> Result<String, StreamsError> {
        match self.access {
            Some(access) if !access.is_empty() => Ok(access),
            _ => Err(StreamsError::Protocol(
                "Invalid token refresh response".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_keeps_extra_fields() {
        let value = json!({"access": "A1", "refresh": "R1", "user_id": 7});
        let resp = LoginResponse::from_value(&value).unwrap();
        assert_eq!(resp.access, "A1");
        assert_eq!(resp.refresh, "R1");
        assert_eq!(resp.extra["user_id"], 7);
    }

    #[test]
    fn login_response_missing_refresh_is_protocol_error() {
        let err = LoginResponse::from_value(&json!({"access": "A1"})).unwrap_err();
        assert_eq!(err.code(), "parse_error");
        assert!(err.to_string().contains("Invalid login response"));
    }

    #[test]
    fn refresh_response_with_access() {
        let resp: RefreshResponse = serde_json::from_value(json!({"access": "A2"})).unwrap();
        assert_eq!(resp.into_access().unwrap(), "A2");
    }

    #[test]
    fn refresh_response_ignores_rotated_refresh() {
        let resp: RefreshResponse =
            serde_json::from_value(json!({"access": "A2", "refresh": "R9"})).unwrap();
        assert_eq!(resp.into_access().unwrap(), "A2");
    }

    #[test]
    fn refresh_response_without_access_is_rejected() {
        let resp: RefreshResponse = serde_json::from_value(json!({"detail": "ok"})).unwrap();
        let err = resp.into_access().unwrap_err();
        assert!(err.to_string().contains("Invalid token refresh response"));

        let empty: RefreshResponse = serde_json::from_value(json!({"access": ""})).unwrap();
        assert!(empty.into_access().is_err());
    }
}
