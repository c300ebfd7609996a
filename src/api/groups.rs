use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::attachments::Attachment;
use super::Id;

pub const GROUP_FETCH_ATTEMPTS: u32 = 3;
pub const GROUP_FETCH_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub is_member: bool,
    #[serde(default)]
    pub is_admin: bool,
}

pub struct Groups<'a> {
    client: &'a ApiClient,
}

impl<'a> Groups<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List groups, retrying up to [`GROUP_FETCH_ATTEMPTS`] times.
    pub async fn list(&self) -> Result<Value, StreamsError> {
        self.list_with_retry(GROUP_FETCH_ATTEMPTS, GROUP_FETCH_DELAY)
            .await
    }

    pub async fn list_with_retry(
        &self,
        attempts: u32,
        delay: Duration,
    ) -> Result<Value, StreamsError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.client.get("/groups/").await {
                Ok(groups) => return Ok(groups),
                Err(e) if attempt >= attempts => {
                    tracing::error!("Failed to fetch groups after {attempts} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(attempt, "Fetching groups failed, retrying: {e}");
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    pub async fn details(&self, slug: &str) -> Result<Value, StreamsError> {
        self.client.get(&format!("/groups/{slug}/")).await
    }

    pub async fn create(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post("/groups/", form).await
    }

    pub async fn update(&self, slug: &str, form: FormData) -> Result<Value, StreamsError> {
        self.client.patch(&format!("/groups/{slug}/"), form).await
    }

    pub async fn delete(&self, slug: &str) -> Result<Value, StreamsError> {
        self.client.delete(&format!("/groups/{slug}/")).await?;
        Ok(json!({ "success": true }))
    }

    pub async fn request_join(&self, slug: &str, message: &str) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/groups/{slug}/request-join/"),
                FormData::new().text("message", message),
            )
            .await
    }

    pub async fn posts(&self, slug: &str) -> Result<Value, StreamsError> {
        self.client.get(&format!("/groups/{slug}/posts/")).await
    }

    pub async fn create_post(
        &self,
        slug: &str,
        content: &str,
        attachments: &[Attachment],
    ) -> Result<Value, StreamsError> {
        let form = attachments
            .iter()
            .fold(FormData::new().text("content", content), |form, a| {
                a.append_to(form, "attachments")
            });
        self.client
            .post(&format!("/groups/{slug}/posts/"), form)
            .await
    }

    pub async fn join_requests(&self, slug: &str) -> Result<Value, StreamsError> {
        self.client
            .get(&format!("/groups/{slug}/join-requests/"))
            .await
    }

    pub async fn approve_join_request(&self, request_id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/group-join-requests/{request_id}/approve/"),
                RequestBody::Empty,
            )
            .await
    }

    pub async fn reject_join_request(&self, request_id: Id) -> Result<Value, StreamsError> {
        self.client
            .post(
                &format!("/group-join-requests/{request_id}/reject/"),
                RequestBody::Empty,
            )
            .await
    }

    pub async fn members(&self, slug: &str) -> Result<Value, StreamsError> {
        self.client.get(&format!("/groups/{slug}/members/")).await
    }

    /// Membership of the current user. Backends without the endpoint (404)
    /// report a non-member.
    pub async fn check_membership(&self, slug: &str) -> Result<Membership, StreamsError> {
        let value = match self
            .client
            .get(&format!("/groups/{slug}/check-membership/"))
            .await
        {
            Ok(value) => value,
            Err(e) if e.status() == Some(404) => return Ok(Membership::default()),
            Err(e) => {
                tracing::error!("Failed to check group membership: {e}");
                return Err(e);
            }
        };
        parse_membership(value)
    }
}

fn parse_membership(value: Value) -> Result<Membership, StreamsError> {
    if value.get("is_member").is_none() {
        return Err(StreamsError::Protocol(
            "Invalid membership check response".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| StreamsError::Protocol(format!("Invalid membership check response: {e}")))
}
