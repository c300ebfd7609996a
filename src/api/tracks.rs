use serde_json::{json, Value};

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::Id;

pub struct Tracks<'a> {
    client: &'a ApiClient,
}

impl<'a> Tracks<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, StreamsError> {
        self.client.get("/tracks/").await
    }

    pub async fn get(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/tracks/{id}/")).await
    }

    /// Upload a new track (audio file plus metadata fields).
    pub async fn upload(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post("/tracks/upload/", form).await
    }

    pub async fn update(&self, id: Id, form: FormData) -> Result<Value, StreamsError> {
        self.client.patch(&format!("/tracks/{id}/"), form).await
    }

    pub async fn delete(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.delete(&format!("/tracks/{id}/")).await
    }

    pub async fn toggle_like(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/tracks/{id}/toggle-like/"), RequestBody::Empty)
            .await
    }

    pub async fn favorite(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/tracks/{id}/favorite/"), RequestBody::Empty)
            .await
    }

    pub async fn comments(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/tracks/{id}/comments/")).await
    }

    pub async fn post_comment(&self, id: Id, content: &str) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/tracks/{id}/comments/"),
                json!({ "content": content }),
            )
            .await
    }
}
