use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use tracing::info;

use crate::{
    common::error::AppError,
    photo::{
        db,
        models::{Photo, PhotoStatus},
    },
    store::document_store::DocumentStore,
};

pub const MAX_FILE_NAME_LEN: usize = 200;

/// Stores a guest photo inline, unapproved. The image host is only contacted
/// when an admin approves it.
pub async fn submit_photo(
    store: &dyn DocumentStore,
    bytes: &[u8],
    file_name: &str,
    content_type: &str,
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Please choose a photo first.".into()));
    }

    if !content_type.starts_with("image/") {
        return Err(AppError::Validation("Only images can be uploaded.".into()));
    }

    let file_name = file_name.trim();
    let file_name: String = file_name.chars().take(MAX_FILE_NAME_LEN).collect();

    let photo = Photo {
        id: String::new(),
        url: format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
        file_name: (!file_name.is_empty()).then_some(file_name),
        uploaded_at: Utc::now(),
        vetted: false,
        hosted_url: None,
        public_id: None,
        status: PhotoStatus::PendingUpload,
    };

    let id = db::save_photo(store, &photo).await?;
    info!("Guest photo {} submitted ({} bytes)", id, bytes.len());
    Ok(id)
}
