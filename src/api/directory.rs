use serde_json::{json, Value};

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::Id;

/// Listing directories that share the same CRUD surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Churches,
    VideoStudios,
    AudioStudios,
    Choirs,
    SoloArtists,
}

impl DirectoryKind {
    pub fn collection(self) -> &'static str {
        match self {
            DirectoryKind::Churches => "churches",
            DirectoryKind::VideoStudios => "video-studios",
            DirectoryKind::AudioStudios => "audio-studios",
            DirectoryKind::Choirs => "choirs",
            DirectoryKind::SoloArtists => "solo-artists",
        }
    }

    /// Action listing the caller's own entries.
    fn mine_action(self) -> &'static str {
        match self {
            DirectoryKind::Churches => "my_churches",
            DirectoryKind::VideoStudios => "my_videostudios",
            DirectoryKind::AudioStudios => "my_audiostudios",
            DirectoryKind::Choirs => "my_choirs",
            DirectoryKind::SoloArtists => "my_profile",
        }
    }

    fn toggle_active_action(self) -> Option<&'static str> {
        match self {
            DirectoryKind::Choirs => Some("toggle_active"),
            DirectoryKind::SoloArtists => Some("toggle-active"),
            _ => None,
        }
    }
}

pub struct Directory<'a> {
    client: &'a ApiClient,
    kind: DirectoryKind,
}

impl<'a> Directory<'a> {
    pub fn new(client: &'a ApiClient, kind: DirectoryKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    fn collection_path(&self) -> String {
        format!("/{}/", self.kind.collection())
    }

    fn item_path(&self, id: Id) -> String {
        format!("/{}/{id}/", self.kind.collection())
    }

    pub async fn list(&self, params: &[(&str, &str)]) -> Result<Value, StreamsError> {
        self.client
            .get_with_query(&self.collection_path(), params)
            .await
    }

    pub async fn get(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn mine(&self) -> Result<Value, StreamsError> {
        self.client
            .get(&format!(
                "/{}/{}/",
                self.kind.collection(),
                self.kind.mine_action()
            ))
            .await
    }

    pub async fn create(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post(&self.collection_path(), form).await
    }

    pub async fn update(&self, id: Id, form: FormData) -> Result<Value, StreamsError> {
        self.client.patch(&self.item_path(id), form).await
    }

    pub async fn delete(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.delete(&self.item_path(id)).await
    }

    /// Flip the active flag. Only choirs and solo artists support it.
    pub async fn toggle_active(&self, id: Id) -> Result<Value, StreamsError> {
        let action = self.kind.toggle_active_action().ok_or_else(|| {
            StreamsError::Protocol(format!(
                "{} do not support toggle_active",
                self.kind.collection()
            ))
        })?;
        self.client
            .post(&format!("{}{action}/", self.item_path(id)), RequestBody::Empty)
            .await
    }

    pub async fn add_member(&self, id: Id, user_id: Id) -> Result<Value, StreamsError> {
        self.require(DirectoryKind::Choirs, "add_member")?;
        self.client
            .post(
                &format!("{}add_member/", self.item_path(id)),
                json!({ "user_id": user_id }),
            )
            .await
    }

    pub async fn update_members(&self, id: Id, count: u64) -> Result<Value, StreamsError> {
        self.require(DirectoryKind::Choirs, "update_members")?;
        self.client
            .post(
                &format!("{}update_members/", self.item_path(id)),
                json!({ "count": count }),
            )
            .await
    }

    fn require(&self, kind: DirectoryKind, action: &str) -> Result<(), StreamsError> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(StreamsError::Protocol(format!(
                "{} do not support {action}",
                self.kind.collection()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mine_actions_match_backend_routes() {
        assert_eq!(DirectoryKind::Churches.mine_action(), "my_churches");
        assert_eq!(DirectoryKind::VideoStudios.mine_action(), "my_videostudios");
        assert_eq!(DirectoryKind::AudioStudios.mine_action(), "my_audiostudios");
        assert_eq!(DirectoryKind::Choirs.mine_action(), "my_choirs");
        assert_eq!(DirectoryKind::SoloArtists.mine_action(), "my_profile");
    }

    #[test]
    fn toggle_active_spelling_differs_per_kind() {
        assert_eq!(DirectoryKind::Choirs.toggle_active_action(), Some("toggle_active"));
        assert_eq!(
            DirectoryKind::SoloArtists.toggle_active_action(),
            Some("toggle-active")
        );
        assert_eq!(DirectoryKind::Churches.toggle_active_action(), None);
    }
}
