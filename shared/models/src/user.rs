use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form field name to value mapping.
pub type Record = Map<String, Value>;

/// Everything stored in `user_data.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub profile: Record,
    #[serde(default)]
    pub custom_fields: Vec<Record>,
    #[serde(default)]
    pub medications: Vec<Record>,
    #[serde(default)]
    pub emergency_contacts: Vec<Record>,
}

/// Payload of `GET`/`POST /save_profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub profile: Record,
    #[serde(default)]
    pub custom_fields: Vec<Record>,
}

impl UserData {
    pub fn profile_payload(&self) -> ProfilePayload {
        ProfilePayload {
            profile: self.profile.clone(),
            custom_fields: self.custom_fields.clone(),
        }
    }
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
