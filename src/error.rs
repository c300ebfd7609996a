use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StreamsError {
    #[error("No authentication token found. Run: streams login <username>")]
    AuthRequired,

    #[error("Session expired - please login again")]
    SessionExpired,

    #[error("Request timeout after {}s on {method} {path} - please check your connection", .duration.as_secs())]
    Timeout {
        method: String,
        path: String,
        duration: Duration,
    },

    #[error("{}", format_backend(.status, .payload))]
    Backend {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Storage error in {}: {detail}", path.display())]
    Storage { path: PathBuf, detail: String },

    #[error("Error in config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_backend(status: &u16, payload: &serde_json::Value) -> String {
    match payload {
        serde_json::Value::Null => format!("Backend returned HTTP {status}"),
        serde_json::Value::String(s) if s.is_empty() => format!("Backend returned HTTP {status}"),
        serde_json::Value::String(s) => format!("Backend returned HTTP {status}: {s}"),
        other => format!("Backend returned HTTP {status}: {other}"),
    }
}

impl StreamsError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            StreamsError::AuthRequired => "auth_required",
            StreamsError::SessionExpired => "session_expired",
            StreamsError::Timeout { .. } => "timeout",
            StreamsError::Backend { .. } => "backend_error",
            StreamsError::Transport(_) => "transport_error",
            StreamsError::Protocol(_) => "parse_error",
            StreamsError::Storage { .. } => "storage_error",
            StreamsError::Config { .. } => "config_error",
            StreamsError::Io(_) => "io_error",
        }
    }

    /// HTTP status of a backend-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamsError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend payload, preserved verbatim for field-level validation messages.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            StreamsError::Backend { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to a login flow.
    pub fn requires_login(&self) -> bool {
        matches!(self, StreamsError::AuthRequired | StreamsError::SessionExpired)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let Some(status) = self.status() {
            obj.insert("status".into(), serde_json::Value::from(status));
        }
        if let Some(payload) = self.payload() {
            obj.insert("payload".into(), payload.clone());
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
