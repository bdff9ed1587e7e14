use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    auth::models::Identity,
    common::error::AppError,
    message::{
        db,
        models::{
            ANONYMOUS, GuestMessage, MAX_MESSAGE_LEN, MAX_NAME_LEN, MessagingSettings,
        },
    },
    store::{
        document_store::{DocumentStore, Subscription},
        models::Document,
    },
    system_log::{builder::SystemLogBuilder, models::LogAction},
};

/// Trims and checks a message before anything is sent to the store.
pub fn validate_message(name: &str, message: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    let message = message.trim();

    if message.is_empty() {
        return Err(AppError::Validation("Message cannot be empty.".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::Validation(format!(
            "Message cannot be longer than {} characters.",
            MAX_MESSAGE_LEN
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Name cannot be longer than {} characters.",
            MAX_NAME_LEN
        )));
    }

    let name = if name.is_empty() { ANONYMOUS } else { name };
    Ok((name.to_string(), message.to_string()))
}

/// Guest side of the message wall.
pub struct MessageWall {
    store: Arc<dyn DocumentStore>,
}

impl MessageWall {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn post_message(&self, name: &str, message: &str) -> Result<GuestMessage, AppError> {
        let (name, message) = validate_message(name, message)?;

        let settings = db::get_settings(self.store.as_ref()).await?;
        if !settings.enabled {
            return Err(AppError::Validation(
                "The message wall is closed right now.".into(),
            ));
        }

        let mut entry = GuestMessage {
            id: String::new(),
            name,
            message,
            created_at: Utc::now(),
        };
        entry.id = db::create_message(self.store.as_ref(), &entry).await?;
        info!("Message {} posted by {}", entry.id, entry.name);
        Ok(entry)
    }

    pub async fn messages(&self) -> Result<Vec<GuestMessage>, AppError> {
        Ok(db::list_messages(self.store.as_ref()).await?)
    }

    /// Live list, newest first. Decode with [`db::decode_messages`].
    pub fn subscribe(&self) -> Subscription<Vec<Document>> {
        db::subscribe_messages(self.store.as_ref())
    }

    pub async fn is_open(&self) -> Result<bool, AppError> {
        Ok(db::get_settings(self.store.as_ref()).await?.enabled)
    }
}

/// Admin controls for the message wall.
pub struct MessageModeration {
    store: Arc<dyn DocumentStore>,
    admin: Identity,
}

impl MessageModeration {
    pub fn new(store: Arc<dyn DocumentStore>, admin: Identity) -> Result<Self, AppError> {
        if !admin.is_admin() {
            warn!("Guest {} tried to open message moderation", admin.voter_id());
            return Err(AppError::AccessDenied);
        }

        Ok(Self { store, admin })
    }

    pub async fn set_messaging_enabled(&self, enabled: bool) -> Result<MessagingSettings, AppError> {
        let settings = MessagingSettings { enabled };
        db::write_settings(self.store.as_ref(), &settings).await?;
        info!("Admin {} set messaging enabled={}", self.admin.voter_id(), enabled);
        Ok(settings)
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), AppError> {
        db::delete_message(self.store.as_ref(), id).await?;
        info!("Admin {} deleted message {}", self.admin.voter_id(), id);

        SystemLogBuilder::new(self.store.clone())
            .subject(&self.admin)
            .action(LogAction::Delete)
            .function("delete_message")
            .description("Deleted guest message")
            .metadata(json!({ "messageId": id }))
            .log_async();

        Ok(())
    }
}
