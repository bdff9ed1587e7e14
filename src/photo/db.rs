use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    client::image_host_client::HostedImage,
    photo::models::{PHOTOS_COLLECTION, Photo, PhotoStatus, PhotoView},
    store::{
        document_store::{DocumentStore, Subscription},
        models::{DocPath, Document, Fields, Query, StoreError, to_fields},
    },
};

fn photo_path(id: &str) -> DocPath {
    DocPath::new(PHOTOS_COLLECTION, id)
}

fn vetted_query(vetted: bool, limit: Option<usize>) -> Query {
    Query::new()
        .where_eq("vetted", vetted)
        .order_desc("uploadedAt")
        .limit_opt(limit)
}

fn fields_of(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

pub fn decode_photo(doc: &Document) -> Result<Photo, StoreError> {
    let mut photo: Photo = doc.decode()?;
    photo.id = doc.id.clone();
    Ok(photo)
}

fn decode_views(rows: &[Document], default_alt: &str) -> Vec<PhotoView> {
    rows.iter()
        .filter_map(|row| match decode_photo(row) {
            Ok(photo) => Some(photo.to_view(default_alt)),
            Err(e) => {
                warn!("Skipping malformed photo {}: {}", row.id, e);
                None
            }
        })
        .collect()
}

pub async fn save_photo(store: &dyn DocumentStore, photo: &Photo) -> Result<String, StoreError> {
    let id = store.add(PHOTOS_COLLECTION, to_fields(photo)?).await?;
    debug!("Saved photo {} awaiting approval", id);
    Ok(id)
}

pub async fn get_photo(store: &dyn DocumentStore, id: &str) -> Result<Option<Photo>, StoreError> {
    match store.get(&photo_path(id)).await? {
        Some(doc) => Ok(Some(decode_photo(&doc)?)),
        None => Ok(None),
    }
}

/// Approved photos, newest first.
pub async fn list_photos(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> Result<Vec<PhotoView>, StoreError> {
    let rows = store
        .list(PHOTOS_COLLECTION, &vetted_query(true, limit))
        .await?;
    Ok(decode_views(&rows, "Uploaded photo"))
}

/// Photos awaiting approval, newest first.
pub async fn list_unvetted_photos(store: &dyn DocumentStore) -> Result<Vec<PhotoView>, StoreError> {
    let rows = store
        .list(PHOTOS_COLLECTION, &vetted_query(false, None))
        .await?;
    Ok(decode_views(&rows, "Pending photo"))
}

pub fn subscribe_photos(store: &dyn DocumentStore, vetted: bool) -> Subscription<Vec<Document>> {
    store.subscribe_query(PHOTOS_COLLECTION, &vetted_query(vetted, None))
}

pub fn photo_views(rows: &[Document], vetted: bool) -> Vec<PhotoView> {
    let default_alt = if vetted { "Uploaded photo" } else { "Pending photo" };
    decode_views(rows, default_alt)
}

pub async fn mark_hosted(
    store: &dyn DocumentStore,
    id: &str,
    hosted: &HostedImage,
) -> Result<(), StoreError> {
    let fields = fields_of(json!({
        "url": hosted.hosted_url,
        "hostedUrl": hosted.hosted_url,
        "publicId": hosted.hosted_id,
        "status": PhotoStatus::Hosted,
    }));
    store.update(&photo_path(id), fields).await
}

pub async fn mark_approved(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    let fields = fields_of(json!({
        "vetted": true,
        "status": PhotoStatus::Approved,
    }));
    store.update(&photo_path(id), fields).await
}

pub async fn delete_photo(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete(&photo_path(id)).await
}
