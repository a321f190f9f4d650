use lib_advisory::models::{CallStatus, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message a connected client may send to narrow its feed.
///
/// By default every client receives both push channels; sending
/// `{"channels": ["snapshot"]}` restricts later deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub channels: Option<Vec<String>>,
}

/// Envelope for every push delivery to a client.
#[derive(Debug, Clone, Serialize)]
pub struct ServerMessage {
    pub r#type: String,
    pub message: Option<Value>,
    pub error: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub full_name: String,
    pub mobile: String,
    #[serde(default)]
    pub admin: bool,
}

/// Login response: the effective profile plus whether the sync degraded
/// to the locally-constructed value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub profile: UserProfile,
    pub degraded: bool,
}

/// Operator status-transition body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: CallStatus,
}

/// Service status report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: String,
    pub last_updated: String,
}
