use serde::{Deserialize, Serialize};

/// Authenticated account as returned by the session lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
}

/// Profile row keyed by the account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub surname: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account already exists for {0}")]
    AlreadyRegistered(String),
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// Session and credential operations, consumed but never reimplemented by
/// the domain core.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Result<Option<UserAccount>, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError>;
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> Result<UserAccount, AuthError>;
    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, AuthError>;
}
