use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
}

/// Body of `GET /auth/me`. Depending on the account kind the server puts
/// the identity under `user` or `admin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub admin: Option<User>,
}

impl SessionPayload {
    pub fn into_user(self) -> Option<User> {
        self.user.or(self.admin)
    }
}
