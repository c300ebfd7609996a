use serde_json::Value;

use crate::client::{ApiClient, RequestBody};
use crate::error::StreamsError;

use super::Id;

pub struct Hymns<'a> {
    client: &'a ApiClient,
}

impl<'a> Hymns<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List hymns filtered by arbitrary query parameters (`search`, `section`, ...).
    pub async fn list(&self, params: &[(&str, &str)]) -> Result<Value, StreamsError> {
        self.client.get_with_query("/hymns/", params).await
    }

    pub async fn get(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/hymns/{id}/")).await
    }

    pub async fn sections(&self) -> Result<Value, StreamsError> {
        self.client.get("/sections/").await
    }

    pub async fn toggle_favorite(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/hymns/{id}/toggle_favorite/"), RequestBody::Empty)
            .await
    }
}
