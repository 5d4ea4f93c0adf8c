//! User model, created on first sign-in.

use serde::{Deserialize, Serialize};

/// Display name used when the identity provider supplies none.
pub const ANONYMOUS: &str = "Anonymous";

/// A signed-in player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: String,
}

impl User {
    /// Name shown on the leaderboard: display name, then email, then anonymous.
    pub fn public_name(&self) -> String {
        public_name(&self.display_name, self.email.as_deref())
    }
}

fn public_name(display_name: &str, email: Option<&str>) -> String {
    if !display_name.trim().is_empty() {
        return display_name.to_string();
    }
    match email {
        Some(email) if !email.trim().is_empty() => email.to_string(),
        _ => ANONYMOUS.to_string(),
    }
}

/// Request body sent by the front-end after the identity provider signs a user in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
