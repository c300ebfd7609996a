use std::io::IsTerminal;

use reqwest::Method;

use crate::client::{ApiClient, RequestBody, RequestOptions};
use crate::error::StreamsError;

use super::output::{print_value, OutputMode};

/// Parse an HTTP method name, case-insensitively.
pub fn parse_method(raw: &str) -> Result<Method, StreamsError> {
    let upper = raw.to_ascii_uppercase();
    match upper.as_str() {
        "GET" | "POST" | "PUT" | "PATCH" | "DELETE" | "HEAD" | "OPTIONS" => {
            Method::from_bytes(upper.as_bytes())
                .map_err(|e| StreamsError::Protocol(format!("Invalid method '{raw}': {e}")))
        }
        _ => Err(StreamsError::Protocol(format!(
            "Unsupported method '{raw}': expected GET, POST, PUT, PATCH or DELETE"
        ))),
    }
}

/// `--data` as a JSON body, or no body at all.
pub fn parse_body(data: Option<&str>) -> Result<RequestBody, StreamsError> {
    match data {
        None => Ok(RequestBody::Empty),
        Some(raw) => serde_json::from_str::<serde_json::Value>(raw)
            .map(RequestBody::Json)
            .map_err(|e| StreamsError::Protocol(format!("Invalid JSON in --data: {e}"))),
    }
}

/// Trailing `key=value` arguments become query parameters.
pub fn parse_query(args: &[String]) -> Result<Vec<(String, String)>, StreamsError> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(StreamsError::Protocol(format!(
                "Cannot parse argument '{arg}': expected 'key=value'"
            ))),
        })
        .collect()
}

/// Paths are relative to `/api`; a missing leading slash is added.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

pub async fn run_call(
    client: &ApiClient,
    method: &str,
    path: &str,
    data: Option<&str>,
    query: &[String],
    mode: OutputMode,
) -> Result<(), StreamsError> {
    let method = parse_method(method)?;
    let body = parse_body(data)?;
    let query = parse_query(query)?;
    let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let options = RequestOptions::new().query(&pairs);

    let value = client
        .request(method, &normalize_path(path), body, options)
        .await?;
    print_value(&value, mode, std::io::stdout().is_terminal());
    Ok(())
}
