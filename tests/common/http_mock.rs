use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Protected GET that accepts only `Bearer {token}`.
#[allow(dead_code)]
pub async fn mount_authorized_get(
    server: &MockServer,
    route: &str,
    token: &str,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Protected route rejecting `Bearer {token}` with 401, expected `times` times.
#[allow(dead_code)]
pub async fn mount_rejected_token(server: &MockServer, route: &str, token: &str, times: u64) {
    Mock::given(path(route))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid"
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Refresh endpoint exchanging `refresh` for `access`, expected `times` times.
#[allow(dead_code)]
pub async fn mount_refresh_ok(server: &MockServer, refresh: &str, access: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(serde_json::json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": access
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Refresh endpoint that always rejects, expected `times` times.
#[allow(dead_code)]
pub async fn mount_refresh_rejected(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Token is invalid or expired"
        })))
        .expect(times)
        .mount(server)
        .await;
}
