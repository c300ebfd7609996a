use serde_json::Value;

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::Id;

pub struct LiveEvents<'a> {
    client: &'a ApiClient,
}

impl<'a> LiveEvents<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, StreamsError> {
        self.client.get("/live-events/").await
    }

    pub async fn create(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post("/live-events/", form).await
    }

    pub async fn end(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/live-events/{id}/end/"), RequestBody::Empty)
            .await
    }

    pub async fn increment_viewers(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/live-events/{id}/increment_viewers/"),
                RequestBody::Empty,
            )
            .await
    }
}
