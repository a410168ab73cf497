use serde::{Deserialize, Serialize};

/// A registered user. Never mutated or deleted after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    /// One-way digest of the credential; the raw value is never stored.
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Optional registration profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
}
