//! User management endpoints.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{BatchDeleteParams, CreateUserParams, Page, UpdateUserParams, User, UserQuery};

#[derive(Clone, Debug)]
pub struct UserService {
    gateway: Gateway,
}

impl UserService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Server-paginated user list.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn list(&self, query: &UserQuery) -> Result<Page<User>, GatewayError> {
        self.gateway.get_with("/user/query", query).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn create(&self, params: &CreateUserParams) -> Result<User, GatewayError> {
        self.gateway.post("/user", params).await
    }

    /// Change role and, when given, password. Email is immutable.
    ///
    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn update(&self, id: &str, params: &UpdateUserParams) -> Result<User, GatewayError> {
        self.gateway.patch(&format!("/user/{id}"), params).await
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway.delete::<Value>(&format!("/user/{id}")).await.map(drop)
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn batch_delete(&self, ids: &[String]) -> Result<(), GatewayError> {
        let params = BatchDeleteParams { ids: ids.to_vec() };
        self.gateway.post::<Value, _>("/user/batch-delete", &params).await.map(drop)
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
