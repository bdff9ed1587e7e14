use tracing::warn;

use crate::{
    message::models::{
        GuestMessage, MESSAGES_COLLECTION, MESSAGING_SETTINGS_ID, MessagingSettings,
        SETTINGS_COLLECTION,
    },
    store::{
        document_store::{DocumentStore, Subscription},
        models::{DocPath, Document, Query, StoreError, to_fields},
    },
};

fn newest_first() -> Query {
    Query::new().order_desc("createdAt")
}

pub fn settings_path() -> DocPath {
    DocPath::new(SETTINGS_COLLECTION, MESSAGING_SETTINGS_ID)
}

pub fn decode_messages(rows: &[Document]) -> Vec<GuestMessage> {
    rows.iter()
        .filter_map(|row| match row.decode::<GuestMessage>() {
            Ok(mut message) => {
                message.id = row.id.clone();
                Some(message)
            }
            Err(e) => {
                warn!("Skipping malformed message {}: {}", row.id, e);
                None
            }
        })
        .collect()
}

pub async fn create_message(store: &dyn DocumentStore, message: &GuestMessage) -> Result<String, StoreError> {
    store.add(MESSAGES_COLLECTION, to_fields(message)?).await
}

pub async fn list_messages(store: &dyn DocumentStore) -> Result<Vec<GuestMessage>, StoreError> {
    let rows = store.list(MESSAGES_COLLECTION, &newest_first()).await?;
    Ok(decode_messages(&rows))
}

pub fn subscribe_messages(store: &dyn DocumentStore) -> Subscription<Vec<Document>> {
    store.subscribe_query(MESSAGES_COLLECTION, &newest_first())
}

pub async fn delete_message(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete(&DocPath::new(MESSAGES_COLLECTION, id)).await
}

pub async fn get_settings(store: &dyn DocumentStore) -> Result<MessagingSettings, StoreError> {
    match store.get(&settings_path()).await? {
        Some(doc) => doc.decode(),
        None => Ok(MessagingSettings::default()),
    }
}

pub async fn write_settings(
    store: &dyn DocumentStore,
    settings: &MessagingSettings,
) -> Result<(), StoreError> {
    store.set(&settings_path(), to_fields(settings)?).await
}
