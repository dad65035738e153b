//! Desktop file-system item endpoints and the saved desktop layout.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{DesktopLayout, FileSystemItem, NewFileSystemItem, UpdateFileSystemItem};

const ITEMS_PATH: &str = "/desktop/items";
const LAYOUT_PATH: &str = "/desktop/layout";

#[derive(Clone, Debug)]
pub struct FileSystemService {
    gateway: Gateway,
}

impl FileSystemService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Every item, across all folders.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn list(&self) -> Result<Vec<FileSystemItem>, GatewayError> {
        self.gateway.get(ITEMS_PATH).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn get(&self, id: &str) -> Result<FileSystemItem, GatewayError> {
        self.gateway.get(&format!("{ITEMS_PATH}/{id}")).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create(&self, item: &NewFileSystemItem) -> Result<FileSystemItem, GatewayError> {
        self.gateway.post(ITEMS_PATH, item).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update(&self, id: &str, patch: &UpdateFileSystemItem) -> Result<FileSystemItem, GatewayError> {
        self.gateway.patch(&format!("{ITEMS_PATH}/{id}"), patch).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("{ITEMS_PATH}/{id}")).await.map(drop)
    }

    /// The saved layout; an empty one when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn get_layout(&self) -> Result<DesktopLayout, GatewayError> {
        let layout: Option<DesktopLayout> = self.gateway.get(LAYOUT_PATH).await?;
        Ok(layout.unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn save_layout(&self, layout: &DesktopLayout) -> Result<DesktopLayout, GatewayError> {
        self.gateway.post(LAYOUT_PATH, layout).await
    }
}

#[cfg(test)]
#[path = "file_system_test.rs"]
mod tests;
