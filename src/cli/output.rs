use colored::Colorize;

use crate::error::StreamsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

/// Text printed for a response body.
pub fn render_value(value: &serde_json::Value, mode: OutputMode) -> String {
    match (mode, value) {
        (OutputMode::Pretty, serde_json::Value::String(s)) => s.clone(),
        (OutputMode::Pretty, serde_json::Value::Null) => "(empty response)".to_string(),
        _ => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

pub fn print_value(value: &serde_json::Value, mode: OutputMode, is_tty: bool) {
    let text = render_value(value, mode);
    if is_tty && mode == OutputMode::Pretty && value.is_null() {
        println!("{}", text.dimmed());
    } else {
        println!("{text}");
    }
}

/// One-line confirmation, green on a terminal.
pub fn print_success(message: &str, is_tty: bool) {
    if is_tty {
        println!("{}", message.green());
    } else {
        println!("{message}");
    }
}

pub fn print_error(err: &StreamsError, mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
        }
        OutputMode::Pretty => {
            let label = if is_tty {
                "Error".red().bold().to_string()
            } else {
                "Error".to_string()
            };
            eprintln!("{label}: {err}");
            if err.requires_login() && is_tty {
                eprintln!("{}", "Run `streams login <username>` to sign in.".dimmed());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_from_flag() {
        assert_eq!(OutputMode::from_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_flag(false), OutputMode::Pretty);
    }

    #[test]
    fn pretty_prints_strings_bare() {
        assert_eq!(render_value(&json!("OK"), OutputMode::Pretty), "OK");
        assert_eq!(render_value(&json!("OK"), OutputMode::Json), "\"OK\"");
    }

    #[test]
    fn pretty_marks_empty_body() {
        assert_eq!(
            render_value(&serde_json::Value::Null, OutputMode::Pretty),
            "(empty response)"
        );
        assert_eq!(render_value(&serde_json::Value::Null, OutputMode::Json), "null");
    }

    #[test]
    fn objects_are_pretty_json() {
        let out = render_value(&json!({"id": 1}), OutputMode::Pretty);
        assert_eq!(out, "{\n  \"id\": 1\n}");
    }

    #[test]
    fn print_error_both_modes() {
        let err = StreamsError::Backend {
            status: 400,
            payload: json!({"title": ["required"]}),
        };
        print_error(&err, OutputMode::Json, false);
        print_error(&err, OutputMode::Pretty, false);
        print_error(&StreamsError::SessionExpired, OutputMode::Pretty, true);
    }
}
