//! Menu category endpoints.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{BatchDeleteParams, Category, CategoryParams, CategoryQuery, Page};

#[derive(Clone, Debug)]
pub struct MenuService {
    gateway: Gateway,
}

impl MenuService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn list(&self, query: &CategoryQuery) -> Result<Page<Category>, GatewayError> {
        self.gateway.get_with("/menu/query", query).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create(&self, params: &CategoryParams) -> Result<Category, GatewayError> {
        self.gateway.post("/menu", params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update(&self, id: &str, params: &CategoryParams) -> Result<Category, GatewayError> {
        self.gateway.patch(&format!("/menu/{id}"), params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("/menu/{id}")).await.map(drop)
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn batch_delete(&self, ids: &[String]) -> Result<(), GatewayError> {
        let params = BatchDeleteParams { ids: ids.to_vec() };
        self.gateway.post::<Value, _>("/menu/batch-delete", &params).await.map(drop)
    }
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
