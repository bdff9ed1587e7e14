use tracing::error;

use crate::{client::image_host_error::ImageHostError, store::models::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Image host error: {0}")]
    ImageHost(#[from] ImageHostError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("No identity present")]
    Unauthenticated,

    #[error("Destructive action was not confirmed")]
    ConfirmationRequired,

    #[error("Failed to delete {failed} of {total} documents")]
    PartialDelete { failed: usize, total: usize },

    #[error("Failed to serialize object: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text shown next to the control that triggered the failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} could not be found.", what),
            AppError::AccessDenied => "Only the admin can do that.".into(),
            AppError::Unauthenticated => "Please sign in first.".into(),
            AppError::ConfirmationRequired => "Please confirm before continuing.".into(),
            AppError::PartialDelete { failed, total } => {
                format!("{} of {} items could not be deleted. Try again.", failed, total)
            }
            AppError::Store(StoreError::PermissionDenied(_)) => {
                "You do not have permission to do that.".into()
            }
            AppError::Store(_) | AppError::ImageHost(_) => "Failed, try again.".into(),
            AppError::Serialize(e) => {
                error!("Serialization failure surfaced to user: {}", e);
                "Something went wrong, try again.".into()
            }
            AppError::Config(e) => {
                error!("Configuration failure surfaced to user: {}", e);
                "Something went wrong, try again.".into()
            }
            AppError::Internal(e) => {
                error!("Internal failure surfaced to user: {}", e);
                "Something went wrong, try again.".into()
            }
        }
    }
}
