pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod local;
pub mod storage;

pub use api::{Attachment, AttachmentKind, DirectoryKind, Id, Membership, UnreadCount};
pub use auth::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use client::{ApiClient, ApiRequest, FormData, RequestBody, RequestOptions};
pub use config::{load_config, ClientConfig, Environment};
pub use error::StreamsError;
pub use local::LocalPrefs;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

