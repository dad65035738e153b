//! Auth service: login, logout and the current-user lookup.
//!
//! DESIGN
//! ======
//! Login and logout are the only places the session is replaced on purpose.
//! The backend call and the session change travel together so no caller can
//! forget one half.

use serde_json::Value;

use crate::gateway::{Gateway, GatewayError};
use crate::models::{AuthSession, LoginParams, LoginResult, SessionUser};

#[derive(Clone, Debug)]
pub struct AuthService {
    gateway: Gateway,
}

impl AuthService {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a token and store the new session.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged; the stored session is untouched
    /// on failure.
    pub async fn login(&self, params: &LoginParams) -> Result<AuthSession, GatewayError> {
        let result: LoginResult = self.gateway.post("/auth/login", params).await?;
        let session = AuthSession::from(result);
        self.gateway.session().establish(session.clone());
        Ok(session)
    }

    /// Tell the backend and drop the local session.
    ///
    /// The local session is dropped even when the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns the backend failure after the session has been ended.
    pub async fn logout(&self) -> Result<(), GatewayError> {
        let result = self.gateway.post_empty::<Value>("/auth/logout").await;
        if self.gateway.session().is_authenticated() {
            self.gateway.session().end();
        }
        match result {
            Ok(_) | Err(GatewayError::Unauthorized { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// See [`Gateway::send`].
    pub async fn current_user(&self) -> Result<SessionUser, GatewayError> {
        self.gateway.get("/user/info").await
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
