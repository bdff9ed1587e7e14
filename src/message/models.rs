use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MESSAGES_COLLECTION: &str = "messages";
pub const SETTINGS_COLLECTION: &str = "settings";
pub const MESSAGING_SETTINGS_ID: &str = "messaging";

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_MESSAGE_LEN: usize = 200;
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestMessage {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Admin switch for the message wall. A missing document means open.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MessagingSettings {
    pub enabled: bool,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
