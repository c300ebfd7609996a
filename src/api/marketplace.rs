use serde_json::{json, Value};

use crate::client::{ApiClient, FormData, RequestBody};
use crate::error::StreamsError;

use super::Id;

/// Products, cart and orders.
pub struct Marketplace<'a> {
    client: &'a ApiClient,
}

impl<'a> Marketplace<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn products(&self, params: &[(&str, &str)]) -> Result<Value, StreamsError> {
        self.client.get_with_query("/products/", params).await
    }

    pub async fn product(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/products/{id}/")).await
    }

    pub async fn product_categories(&self) -> Result<Value, StreamsError> {
        self.client.get("/product-categories/").await
    }

    pub async fn create_product(&self, form: FormData) -> Result<Value, StreamsError> {
        self.client.post("/products/", form).await
    }

    pub async fn update_product(&self, id: Id, form: FormData) -> Result<Value, StreamsError> {
        self.client.patch(&format!("/products/{id}/"), form).await
    }

    pub async fn delete_product(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.delete(&format!("/products/{id}/")).await
    }

    pub async fn cart(&self) -> Result<Value, StreamsError> {
        self.client.get("/cart/").await
    }

    pub async fn add_to_cart(&self, product_id: Id, quantity: u32) -> Result<Value, StreamsError> {
        self.client
            .post(
                "/cart/add/",
                json!({ "product_id": product_id, "quantity": quantity }),
            )
            .await
    }

    pub async fn remove_from_cart(&self, item_id: Id) -> Result<Value, StreamsError> {
        self.client
            .post("/cart/remove/", json!({ "item_id": item_id }))
            .await
    }

    pub async fn checkout(&self) -> Result<Value, StreamsError> {
        self.client.post("/cart/checkout/", RequestBody::Empty).await
    }

    pub async fn orders(&self) -> Result<Value, StreamsError> {
        self.client.get("/orders/").await
    }

    pub async fn order(&self, id: Id) -> Result<Value, StreamsError> {
        self.client.get(&format!("/orders/{id}/")).await
    }

    /// Submit payment details for an order; the payload is passed through.
    pub async fn pay_order(&self, id: Id, payment: Value) -> Result<Value, StreamsError> {
        self.client
            .post(&format!("/orders/{id}/pay/"), payment)
            .await
    }
}
