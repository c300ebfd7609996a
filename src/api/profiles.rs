use serde_json::Value;

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::Id;

pub struct Profiles<'a> {
    client: &'a ApiClient,
}

impl<'a> Profiles<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<Value, StreamsError> {
        self.client.get("/profiles/me/").await
    }

    pub async fn check_or_redirect(&self) -> Result<Value, StreamsError> {
        self.client.get("/profiles/check_or_redirect/").await
    }

    pub async fn has_profile(&self) -> Result<Value, StreamsError> {
        self.client.get("/profiles/has_profile/").await
    }

    pub async fn by_user(&self, user_id: Id) -> Result<Value, StreamsError> {
        self.client
            .get(&format!("/profiles/by_user/{user_id}/"))
            .await
    }

    pub async fn create(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post("/profiles/create_profile/", form).await
    }

    pub async fn follow_user(&self, user_id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/users/{user_id}/follow/"), RequestBody::Empty)
            .await
    }
}
