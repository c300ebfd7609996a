use reqwest::Method;
use serde_json::{json, Value};

use crate::client::{ApiClient, FormData, RequestBody, RequestOptions};
use crate::error::StreamsError;

use super::Id;

pub struct SocialPosts<'a> {
    client: &'a ApiClient,
}

impl<'a> SocialPosts<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, StreamsError> {
        self.client.get("/social-posts/").await
    }

    pub async fn create(&self, form: FormData) -> Result<Value, StreamsError> {
        tracing::debug!(fields = form.parts().len(), "Creating social post");
        self.client.post("/social-posts/", form).await
    }

    pub async fn delete(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.delete(&format!("/social-posts/{id}/")).await
    }

    pub async fn like(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/social-posts/{id}/like/"), RequestBody::Empty)
            .await
    }

    pub async fn comment(&self, id: Id, content: &str) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/social-posts/{id}/comment/"),
                json!({ "content": content }),
            )
            .await
    }

    pub async fn comments(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .get(&format!("/social-posts/{id}/comments/"))
            .await
    }

    pub async fn save(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/social-posts/{id}/save_post/"), RequestBody::Empty)
            .await
    }

    pub async fn share(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/social-posts/{id}/share/")).await
    }

    /// Raw bytes of the post's media attachment.
    pub async fn download_media(&self, id: Id) -> Result<Vec<u8>, StreamsError> {
        self.client
            .request_bytes(
                Method::GET,
                &format!("/social-posts/{id}/download/"),
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }
}
