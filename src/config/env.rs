use crate::error::StreamsError;

/// Expand environment variable references in a config string.
///
/// - `${VAR}` is replaced with the variable's value; unset is an error.
/// - `${VAR:-fallback}` uses `fallback` when the variable is unset or empty.
///
/// A `$` that does not open `${` is copied through.
pub fn expand_env_vars(input: &str) -> Result<String, StreamsError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            env_error(format!("Unclosed variable reference: ${{{after}"))
        })?;
        let expr = &after[..end];

        match expr.split_once(":-") {
            Some((name, fallback)) => match std::env::var(name) {
                Ok(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            },
            None => {
                let val = std::env::var(expr).map_err(|_| {
                    env_error(format!("Environment variable '{expr}' is not set"))
                })?;
                result.push_str(&val);
            }
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

fn env_error(detail: String) -> StreamsError {
    StreamsError::Config {
        path: std::path::PathBuf::from("<env>"),
        detail,
    }
}
