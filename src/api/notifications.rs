use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, RequestBody, RequestOptions};
use crate::error::StreamsError;

use super::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}

pub struct Notifications<'a> {
    client: &'a ApiClient,
}

impl<'a> Notifications<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value, StreamsError> {
        self.client.get("/notifications/").await
    }

    pub async fn unread_count(&self) -> Result<UnreadCount, StreamsError> {
        self.client
            .request_as(
                Method::GET,
                "/notifications/unread_count/",
                RequestBody::Empty,
                RequestOptions::default(),
            )
            .await
    }

    pub async fn mark_as_read(&self, id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/notifications/{id}/mark_as_read/"),
                RequestBody::Empty,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_count_deserialization() {
        let count: UnreadCount = serde_json::from_str(r#"{"unread_count": 4}"#).unwrap();
        assert_eq!(count.unread_count, 4);
    }
}
