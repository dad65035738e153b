//! Marketplace catalog endpoints.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{FileSystemItem, MarketApp, MarketAppParams, MarketQuery};

#[derive(Clone, Debug)]
pub struct MarketService {
    gateway: Gateway,
}

impl MarketService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Catalog filtered server-side by category and search text.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn list(&self, query: &MarketQuery) -> Result<Vec<MarketApp>, GatewayError> {
        self.gateway.get_with("/market", query).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn get(&self, id: &str) -> Result<MarketApp, GatewayError> {
        self.gateway.get(&format!("/market/{id}")).await
    }

    /// Install an app onto the desktop; returns the created desktop item.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn install(&self, id: &str) -> Result<FileSystemItem, GatewayError> {
        self.gateway.post_empty(&format!("/market/{id}/install")).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create(&self, params: &MarketAppParams) -> Result<MarketApp, GatewayError> {
        self.gateway.post("/market", params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update(&self, id: &str, params: &MarketAppParams) -> Result<MarketApp, GatewayError> {
        self.gateway.patch(&format!("/market/{id}"), params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("/market/{id}")).await.map(drop)
    }
}

#[cfg(test)]
#[path = "market_test.rs"]
mod tests;
