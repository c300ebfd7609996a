pub mod http_mock;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use streams_client::{ApiClient, ClientConfig, KeyValueStore, MemoryStore};

/// Client against `api_base` backed by an in-memory store the test can inspect.
#[allow(dead_code)]
pub fn memory_client(api_base: &str) -> (Arc<MemoryStore>, ApiClient) {
    let store = Arc::new(MemoryStore::new());
    let config = ClientConfig::new(api_base)
        .with_refresh_timeout(Duration::from_secs(2))
        .with_helper_timeout(Duration::from_secs(5));
    let client = ApiClient::new(config, store.clone()).unwrap();
    (store, client)
}

/// Seed both tokens directly, as a previous login would have.
#[allow(dead_code)]
pub async fn seed_tokens(store: &MemoryStore, access: &str, refresh: &str) {
    store
        .multi_set(&[("accessToken", access), ("refreshToken", refresh)])
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn stored(store: &MemoryStore, key: &str) -> Option<String> {
    store.get(key).await.unwrap()
}

/// Create a temp directory with a streams.json pointing at `api_base` and a
/// storage file inside the same directory.
#[allow(dead_code)]
pub fn temp_config_dir(api_base: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let config = serde_json::json!({
        "apiBase": api_base,
        "storagePath": storage.to_string_lossy(),
        "timeouts": { "helperMs": 5000, "refreshMs": 2000 }
    });
    std::fs::write(
        dir.path().join("streams.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
    dir
}

#[allow(dead_code)]
pub fn read_storage(dir: &Path) -> serde_json::Value {
    match std::fs::read_to_string(dir.join("storage.json")) {
        Ok(raw) => serde_json::from_str(&raw).unwrap(),
        Err(_) => serde_json::json!({}),
    }
}
