use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}

/// The signed-in principal as cached next to the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    /// Older backends send `username` here.
    #[serde(alias = "username")]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub access_token: String,
    pub user: SessionUser,
}

/// Token and profile pair; replaced wholesale, never patched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: Option<SessionUser>,
}

impl From<LoginResult> for AuthSession {
    fn from(result: LoginResult) -> Self {
        Self { token: result.access_token, user: Some(result.user) }
    }
}
