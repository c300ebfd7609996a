use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::Id;
use crate::client::ApiClient;
use crate::error::StreamsError;
use crate::storage::KeyValueStore;

pub const FAVORITE_TRACKS_KEY: &str = "favoriteTracks";
const JOIN_REQUEST_PREFIX: &str = "joinRequest-";

pub type TrackId = Id;

/// Stored shape of one favorite: `{"id": 12}`.
#[derive(Debug, Serialize, Deserialize)]
struct FavoriteEntry {
    id: TrackId,
}

/// Device-local preferences kept alongside the session tokens.
#[derive(Debug, Clone)]
pub struct LocalPrefs {
    storage: Arc<dyn KeyValueStore>,
}

impl LocalPrefs {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Favorited track ids. A missing or unreadable entry is an empty set.
    pub async fn favorite_tracks(&self) -> Result<BTreeSet<TrackId>, StreamsError> {
        let Some(raw) = self.storage.get(FAVORITE_TRACKS_KEY).await? else {
            return Ok(BTreeSet::new());
        };
        match serde_json::from_str::<Option<Vec<FavoriteEntry>>>(&raw) {
            Ok(entries) => Ok(entries.unwrap_or_default().into_iter().map(|e| e.id).collect()),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {FAVORITE_TRACKS_KEY}: {e}");
                Ok(BTreeSet::new())
            }
        }
    }

    pub async fn is_favorite(&self, id: TrackId) -> Result<bool, StreamsError> {
        Ok(self.favorite_tracks().await?.contains(&id))
    }

    /// Flip the favorite state of `id` and return the new state.
    pub async fn toggle_favorite(&self, id: TrackId) -> Result<bool, StreamsError> {
        let mut favorites = self.favorite_tracks().await?;
        let now_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id);
            true
        };
        self.save_favorites(&favorites).await?;
        Ok(now_favorite)
    }

    async fn save_favorites(&self, favorites: &BTreeSet<TrackId>) -> Result<(), StreamsError> {
        let entries: Vec<FavoriteEntry> = favorites.iter().map(|&id| FavoriteEntry { id }).collect();
        let data = serde_json::to_string(&entries).map_err(|e| {
            StreamsError::Protocol(format!("Failed to serialize favorites: {e}"))
        })?;
        self.storage.set(FAVORITE_TRACKS_KEY, &data).await
    }

    pub async fn mark_join_requested(&self, group_slug: &str) -> Result<(), StreamsError> {
        self.storage.set(&join_request_key(group_slug), "true").await
    }

    pub async fn has_pending_join_request(&self, group_slug: &str) -> Result<bool, StreamsError> {
        Ok(self
            .storage
            .get(&join_request_key(group_slug))
            .await?
            .as_deref()
            == Some("true"))
    }

    pub async fn clear_join_request(&self, group_slug: &str) -> Result<(), StreamsError> {
        self.storage.remove(&join_request_key(group_slug)).await
    }
}

impl ApiClient {
    /// Preferences stored in the same device storage as the tokens.
    pub fn local_prefs(&self) -> LocalPrefs {
        LocalPrefs::new(self.storage().clone())
    }
}

fn join_request_key(group_slug: &str) -> String {
    format!("{JOIN_REQUEST_PREFIX}{group_slug}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn prefs() -> (Arc<MemoryStore>, LocalPrefs) {
        let mem = Arc::new(MemoryStore::new());
        (mem.clone(), LocalPrefs::new(mem))
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let (_, prefs) = prefs();
        assert!(prefs.toggle_favorite(7).await.unwrap());
        assert!(prefs.is_favorite(7).await.unwrap());
        assert!(!prefs.toggle_favorite(7).await.unwrap());
        assert!(!prefs.is_favorite(7).await.unwrap());
    }

    #[tokio::test]
    async fn favorites_use_list_of_id_objects() {
        let (mem, prefs) = prefs();
        prefs.toggle_favorite(3).await.unwrap();
        prefs.toggle_favorite(1).await.unwrap();
        let raw = mem.get(FAVORITE_TRACKS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":1},{"id":3}]"#);
    }

    #[tokio::test]
    async fn reads_existing_favorites() {
        let (mem, prefs) = prefs();
        mem.set(FAVORITE_TRACKS_KEY, r#"[{"id": 5}, {"id": 2}, {"id": 5}]"#)
            .await
            .unwrap();
        let favs = prefs.favorite_tracks().await.unwrap();
        assert_eq!(favs.into_iter().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[tokio::test]
    async fn corrupt_or_null_favorites_read_empty() {
        let (mem, prefs) = prefs();
        mem.set(FAVORITE_TRACKS_KEY, "null").await.unwrap();
        assert!(prefs.favorite_tracks().await.unwrap().is_empty());
        mem.set(FAVORITE_TRACKS_KEY, "{oops").await.unwrap();
        assert!(prefs.favorite_tracks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn join_request_flags_are_per_group() {
        let (mem, prefs) = prefs();
        prefs.mark_join_requested("youth-choir").await.unwrap();
        assert!(prefs.has_pending_join_request("youth-choir").await.unwrap());
        assert!(!prefs.has_pending_join_request("elders").await.unwrap());
        assert_eq!(
            mem.get("joinRequest-youth-choir").await.unwrap().as_deref(),
            Some("true")
        );

        prefs.clear_join_request("youth-choir").await.unwrap();
        assert!(!prefs.has_pending_join_request("youth-choir").await.unwrap());
    }
}
