use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use streams_client::cli::output::{print_error, OutputMode};

#[derive(Parser)]
#[command(name = "streams", version, about = "Command-line client for the Streams backend API")]
struct Cli {
    /// Path to a streams.json config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// JSON output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session tokens
    Login {
        username: String,

        /// Account password
        #[arg(long, env = "STREAMS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// Send an authenticated request to the API
    Call {
        /// HTTP method (GET, POST, PATCH, PUT, DELETE)
        method: String,

        /// Path under /api, e.g. /tracks/
        path: String,

        /// Query parameters as key=value
        query: Vec<String>,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// Show the logged-in user's profile
    Me,

    /// Manage favorite tracks stored on this device
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite track ids
    List,
    /// Add or remove a track from favorites
    Toggle {
        /// Track id
        id: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("STREAMS_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = OutputMode::from_flag(cli.json);

    if let Err(e) = run(cli, mode).await {
        print_error(&e, mode, std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<(), streams_client::StreamsError> {
    let config = streams_client::load_config(cli.config.as_deref())?;
    let client = streams_client::ApiClient::from_config(config)?;

    match cli.command {
        Commands::Login { username, password } => {
            streams_client::cli::session::run_login(&client, &username, &password, mode).await
        }
        Commands::Logout => streams_client::cli::session::run_logout(&client, mode).await,
        Commands::Status => streams_client::cli::session::run_status(&client, mode).await,
        Commands::Call {
            method,
            path,
            query,
            data,
        } => {
            streams_client::cli::call::run_call(
                &client,
                &method,
                &path,
                data.as_deref(),
                &query,
                mode,
            )
            .await
        }
        Commands::Me => streams_client::cli::session::run_me(&client, mode).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => streams_client::cli::favorites::run_list(&client, mode).await,
            FavoritesAction::Toggle { id } => {
                streams_client::cli::favorites::run_toggle(&client, id, mode).await
            }
        },
    }
}
