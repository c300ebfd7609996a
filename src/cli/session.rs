use std::io::IsTerminal;

use serde_json::json;

use crate::client::ApiClient;
use crate::error::StreamsError;

use super::output::{print_success, print_value, OutputMode};

pub async fn run_login(
    client: &ApiClient,
    username: &str,
    password: &str,
    mode: OutputMode,
) -> Result<(), StreamsError> {
    client.login(username, password).await?;
    match mode {
        OutputMode::Json => print_value(
            &json!({ "loggedIn": true, "username": username }),
            mode,
            false,
        ),
        OutputMode::Pretty => print_success(
            &format!("Logged in as {username}"),
            std::io::stdout().is_terminal(),
        ),
    }
    Ok(())
}

pub async fn run_logout(client: &ApiClient, mode: OutputMode) -> Result<(), StreamsError> {
    client.logout().await?;
    match mode {
        OutputMode::Json => print_value(&json!({ "loggedIn": false }), mode, false),
        OutputMode::Pretty => print_success("Logged out", std::io::stdout().is_terminal()),
    }
    Ok(())
}

/// Report whether a session is stored. Never contacts the backend.
pub async fn run_status(client: &ApiClient, mode: OutputMode) -> Result<(), StreamsError> {
    let logged_in = client.is_authenticated().await;
    let api_base = &client.config().api_base;
    match mode {
        OutputMode::Json => print_value(
            &json!({ "loggedIn": logged_in, "apiBase": api_base }),
            mode,
            false,
        ),
        OutputMode::Pretty if logged_in => print_success(
            &format!("Logged in ({api_base})"),
            std::io::stdout().is_terminal(),
        ),
        OutputMode::Pretty => println!("Not logged in ({api_base})"),
    }
    Ok(())
}

pub async fn run_me(client: &ApiClient, mode: OutputMode) -> Result<(), StreamsError> {
    let user = client.current_user().await?;
    print_value(&user, mode, std::io::stdout().is_terminal());
    Ok(())
}
