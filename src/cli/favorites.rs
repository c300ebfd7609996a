use std::io::IsTerminal;

use serde_json::json;

use crate::client::ApiClient;
use crate::error::StreamsError;
use crate::local::TrackId;

use super::output::{print_success, print_value, OutputMode};

pub async fn run_list(client: &ApiClient, mode: OutputMode) -> Result<(), StreamsError> {
    let favorites = client.local_prefs().favorite_tracks().await?;
    match mode {
        OutputMode::Json => print_value(&json!(favorites), mode, false),
        OutputMode::Pretty if favorites.is_empty() => println!("No favorite tracks"),
        OutputMode::Pretty => {
            for id in favorites {
                println!("{id}");
            }
        }
    }
    Ok(())
}

pub async fn run_toggle(
    client: &ApiClient,
    id: TrackId,
    mode: OutputMode,
) -> Result<(), StreamsError> {
    let favorite = client.local_prefs().toggle_favorite(id).await?;
    match mode {
        OutputMode::Json => print_value(&json!({ "id": id, "favorite": favorite }), mode, false),
        OutputMode::Pretty => {
            let message = if favorite {
                format!("Track {id} added to favorites")
            } else {
                format!("Track {id} removed from favorites")
            };
            print_success(&message, std::io::stdout().is_terminal());
        }
    }
    Ok(())
}
