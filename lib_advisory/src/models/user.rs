use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// A subscriber profile, keyed by mobile number in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub mobile: String,
    /// Client code of the form "AF-12345", assigned at first login.
    pub client_id: String,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}
