//! Dictionary endpoints: types, their data rows, and select options.
//!
//! DESIGN
//! ======
//! A dictionary type is addressed by id for edits and by its code for
//! lookups. [`DictionaryService::options`] is the read path other screens use
//! to fill select inputs: rows sorted by `order`, missing order sorting as 0,
//! ties keeping backend order.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{
    BatchCreateParams, CreateDictDataParams, CreateDictTypeParams, DictData, DictOption, DictType, UpdateDictDataParams,
    UpdateDictTypeParams,
};

#[derive(Clone, Debug)]
pub struct DictionaryService {
    gateway: Gateway,
}

impl DictionaryService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    // =========================================================================
    // TYPES
    // =========================================================================

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn list_types(&self) -> Result<Vec<DictType>, GatewayError> {
        self.gateway.get("/dictionary/type").await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn type_by_code(&self, code: &str) -> Result<DictType, GatewayError> {
        self.gateway.get(&format!("/dictionary/type/code/{code}")).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create_type(&self, params: &CreateDictTypeParams) -> Result<DictType, GatewayError> {
        self.gateway.post("/dictionary/type", params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update_type(&self, id: &str, params: &UpdateDictTypeParams) -> Result<DictType, GatewayError> {
        self.gateway.patch(&format!("/dictionary/type/{id}"), params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete_type(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("/dictionary/type/{id}")).await.map(drop)
    }

    // =========================================================================
    // DATA
    // =========================================================================

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn data_by_code(&self, code: &str) -> Result<Vec<DictData>, GatewayError> {
        self.gateway.get(&format!("/dictionary/data/code/{code}")).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create_data(&self, params: &CreateDictDataParams) -> Result<DictData, GatewayError> {
        self.gateway.post("/dictionary/data", params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update_data(&self, id: &str, params: &UpdateDictDataParams) -> Result<DictData, GatewayError> {
        self.gateway.patch(&format!("/dictionary/data/{id}"), params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete_data(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("/dictionary/data/{id}")).await.map(drop)
    }

    /// Create a type (if missing) and several rows in one call.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn batch_create(&self, params: &BatchCreateParams) -> Result<(), GatewayError> {
        self.gateway.post::<Value, _>("/dictionary/batch", params).await.map(drop)
    }

    // =========================================================================
    // OPTIONS
    // =========================================================================

    /// Select options for `code`. An empty code yields no options and no call.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn options(&self, code: &str) -> Result<Vec<DictOption>, GatewayError> {
        if code.is_empty() {
            return Ok(Vec::new());
        }
        let data = self.data_by_code(code).await?;
        Ok(sort_options(data))
    }
}

/// Order rows for display; stable, so equal orders keep backend order.
pub(crate) fn sort_options(mut data: Vec<DictData>) -> Vec<DictOption> {
    data.sort_by_key(|row| row.order.unwrap_or(0));
    data.into_iter().map(DictOption::from).collect()
}

#[cfg(test)]
#[path = "dictionary_test.rs"]
mod tests;
