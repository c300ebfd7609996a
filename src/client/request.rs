use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::error::StreamsError;

/// A single form field. Kept as owned data so a form can be rebuilt for a
/// retried send.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        mime_type: String,
    },
}

/// Multipart form description, converted to a `reqwest` form on every send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_string(), FormValue::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: &str,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.parts.push((
            name.to_string(),
            FormValue::File {
                bytes,
                file_name: file_name.into(),
                mime_type: mime_type.into(),
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn to_form(&self) -> Result<Form, StreamsError> {
        let mut form = Form::new();
        for (name, value) in &self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name.clone(), text.clone()),
                FormValue::File {
                    bytes,
                    file_name,
                    mime_type,
                } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime_type)
                        .map_err(|e| {
                            StreamsError::Protocol(format!(
                                "Invalid MIME type '{mime_type}' for field '{name}': {e}"
                            ))
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(FormData),
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Multipart(form)
    }
}

/// Per-call overrides on top of the helper defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, params: &[(&str, &str)]) -> Self {
        self.query.extend(
            params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        self
    }
}

/// A request against the backend API, addressed by its path under `/api`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: RequestBody::Empty,
            options: RequestOptions::default(),
        }
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Where a request is in its refresh-and-retry lifecycle.
///
/// Only an `Initial` attempt may trigger a token refresh; the resend after a
/// refresh is a `Retry` and its outcome is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

impl Attempt {
    pub fn may_refresh(self) -> bool {
        self == Attempt::Initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_data_keeps_part_order() {
        let form = FormData::new()
            .text("content", "hello")
            .file("attachments", vec![1, 2, 3], "a.jpg", "image/jpeg");
        let names: Vec<&str> = form.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["content", "attachments"]);
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn invalid_mime_type_is_rejected() {
        let form = FormData::new().file("audio", vec![0], "a.m4a", "not a mime");
        let err = form.to_form().unwrap_err();
        assert!(err.to_string().contains("Invalid MIME type"));
    }

    #[test]
    fn options_builder() {
        let opts = RequestOptions::new()
            .timeout(Duration::from_secs(5))
            .header("X-Client", "cli")
            .query(&[("search", "amazing grace"), ("page", "2")]);
        assert_eq!(opts.timeout, Some(Duration::from_secs(5)));
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(opts.query[0], ("search".to_string(), "amazing grace".to_string()));
    }

    #[test]
    fn only_initial_attempt_may_refresh() {
        assert!(Attempt::Initial.may_refresh());
        assert!(!Attempt::Retry.may_refresh());
    }

    #[test]
    fn body_conversions() {
        let body: RequestBody = serde_json::json!({"content": "hi"}).into();
        assert!(matches!(body, RequestBody::Json(_)));
        let body: RequestBody = FormData::new().text("message", "").into();
        assert!(matches!(body, RequestBody::Multipart(_)));
        assert_eq!(RequestBody::default(), RequestBody::Empty);
    }
}
