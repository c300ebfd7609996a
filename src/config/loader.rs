use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::StreamsError;

use super::env::expand_env_vars;
use super::types::{ClientConfig, ConfigFile, Environment};

/// Remove `//` line comments and `/* */` block comments outside of strings.
/// Newlines inside comments are kept so serde error positions stay accurate.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Find the config file to use. The first existing candidate wins:
///
/// 1. `--config` CLI flag
/// 2. `STREAMS_CONFIG` env var
/// 3. `./config/streams.json`
/// 4. `~/.streams/streams.json`, then `~/.streams/streams.jsonc`
pub fn discover_config_file(cli_config: Option<&str>) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = cli_config {
        candidates.push(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var("STREAMS_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.push(PathBuf::from("./config/streams.json"));
    if let Some(home) = dirs::home_dir() {
        let base = home.join(".streams");
        candidates.push(base.join("streams.json"));
        candidates.push(base.join("streams.jsonc"));
    }

    candidates.into_iter().find(|p| p.is_file())
}

fn load_config_file(path: &Path) -> Result<ConfigFile, StreamsError> {
    let content = std::fs::read_to_string(path).map_err(|e| StreamsError::Config {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    serde_json::from_str(&strip_jsonc_comments(&content)).map_err(|e| StreamsError::Config {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Values taken from the process environment, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub environment: Option<String>,
    pub api_base: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("STREAMS_ENV").ok().filter(|v| !v.is_empty()),
            api_base: std::env::var("STREAMS_API_BASE").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Check that `api_base` is an absolute http(s) URL and normalize it.
pub fn validate_api_base(api_base: &str, source: &Path) -> Result<String, StreamsError> {
    let url = reqwest::Url::parse(api_base).map_err(|e| StreamsError::Config {
        path: source.to_path_buf(),
        detail: format!("Invalid apiBase '{api_base}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(api_base.trim_end_matches('/').to_string()),
        scheme => Err(StreamsError::Config {
            path: source.to_path_buf(),
            detail: format!("Unsupported URL scheme '{scheme}' in '{api_base}'"),
        }),
    }
}

/// Merge a parsed config file with environment overrides.
pub fn resolve(
    file: ConfigFile,
    overrides: EnvOverrides,
    source: &Path,
) -> Result<ClientConfig, StreamsError> {
    let environment = match overrides.environment.as_deref() {
        Some(raw) => Environment::parse(raw).ok_or_else(|| StreamsError::Config {
            path: PathBuf::from("<env>"),
            detail: format!("Unknown STREAMS_ENV '{raw}' (expected development or production)"),
        })?,
        None => file.environment.unwrap_or_default(),
    };

    let api_base = match overrides.api_base.or(file.api_base) {
        Some(raw) => expand_env_vars(&raw)?,
        None => environment.default_api_base().to_string(),
    };
    let api_base = validate_api_base(&api_base, source)?;

    let mut config = ClientConfig::new(&api_base);
    if let Some(path) = file.storage_path {
        config.storage_path = PathBuf::from(expand_env_vars(&path)?);
    }
    if let Some(ms) = file.timeouts.request_ms {
        config.request_timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = file.timeouts.helper_ms {
        config.helper_timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = file.timeouts.refresh_ms {
        config.refresh_timeout = Duration::from_millis(ms);
    }

    Ok(config)
}

/// Load the client configuration from the discovered file (if any) and the
/// environment.
pub fn load_config(cli_config: Option<&str>) -> Result<ClientConfig, StreamsError> {
    if let Some(path) = cli_config {
        if !Path::new(path).is_file() {
            return Err(StreamsError::Config {
                path: PathBuf::from(path),
                detail: "Cannot read file: not found".to_string(),
            });
        }
    }

    let (file, source) = match discover_config_file(cli_config) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            (load_config_file(&path)?, path)
        }
        None => (ConfigFile::default(), PathBuf::from("<default>")),
    };

    resolve(file, EnvOverrides::from_env(), &source)
}
