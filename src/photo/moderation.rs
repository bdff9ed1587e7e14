use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::{
    auth::models::Identity,
    client::image_host_client::ImageHost,
    common::error::AppError,
    photo::{
        db,
        models::{Photo, PhotoStatus, PhotoView},
    },
    store::document_store::DocumentStore,
    system_log::{builder::SystemLogBuilder, models::LogAction},
};

/// Admin review queue for guest photos.
pub struct PhotoModeration {
    store: Arc<dyn DocumentStore>,
    image_host: Arc<dyn ImageHost>,
    admin: Identity,
}

impl PhotoModeration {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        image_host: Arc<dyn ImageHost>,
        admin: Identity,
    ) -> Result<Self, AppError> {
        if !admin.is_admin() {
            warn!("Guest {} tried to open photo moderation", admin.voter_id());
            return Err(AppError::AccessDenied);
        }

        Ok(Self {
            store,
            image_host,
            admin,
        })
    }

    pub async fn pending(&self) -> Result<Vec<PhotoView>, AppError> {
        Ok(db::list_unvetted_photos(self.store.as_ref()).await?)
    }

    /// Moves a photo through `pending_upload -> hosted -> approved`.
    ///
    /// Each step is written before the next starts. Retrying after a failure
    /// resumes from the last persisted step and never uploads twice once the
    /// photo is hosted. Approving an approved photo does nothing.
    pub async fn approve_photo(&self, id: &str) -> Result<Photo, AppError> {
        let mut photo = db::get_photo(self.store.as_ref(), id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {}", id)))?;

        match photo.effective_status() {
            PhotoStatus::Approved => {
                info!("Photo {} is already approved", id);
                return Ok(photo);
            }
            PhotoStatus::PendingUpload => {
                let hosted = self.image_host.upload(&photo.url).await?;
                db::mark_hosted(self.store.as_ref(), id, &hosted).await?;
                info!("Photo {} hosted at {}", id, hosted.hosted_url);

                photo.url = hosted.hosted_url.clone();
                photo.hosted_url = Some(hosted.hosted_url);
                photo.public_id = Some(hosted.hosted_id);
                photo.status = PhotoStatus::Hosted;
            }
            PhotoStatus::Hosted => {}
        }

        db::mark_approved(self.store.as_ref(), id).await?;
        photo.vetted = true;
        photo.status = PhotoStatus::Approved;
        info!("Admin {} approved photo {}", self.admin.voter_id(), id);

        SystemLogBuilder::new(self.store.clone())
            .subject(&self.admin)
            .action(LogAction::Update)
            .function("approve_photo")
            .description("Approved guest photo")
            .metadata(json!({ "photoId": id }))
            .log_async();

        Ok(photo)
    }

    /// Removes the record. The hosted copy, if any, is left on the image host.
    pub async fn delete_photo(&self, id: &str) -> Result<(), AppError> {
        db::delete_photo(self.store.as_ref(), id).await?;
        info!("Admin {} deleted photo {}", self.admin.voter_id(), id);

        SystemLogBuilder::new(self.store.clone())
            .subject(&self.admin)
            .action(LogAction::Delete)
            .function("delete_photo")
            .description("Deleted guest photo")
            .metadata(json!({ "photoId": id }))
            .log_async();

        Ok(())
    }
}
