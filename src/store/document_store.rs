use std::{
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::store::models::{BatchOutcome, DocPath, Document, Fields, Query, StoreError};

/// The external document database as seen by the view models.
///
/// Single-document writes come in three flavours: `set` overwrites the whole
/// document, `update` merges fields into an existing one and `create` only
/// succeeds when nothing lives at the path yet.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError>;

    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError>;

    async fn create(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError>;

    /// Appends a document with a generated id and returns the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError>;

    async fn list(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Deletes every id independently. Ids already deleted stay deleted when a
    /// later one fails.
    async fn delete_many(&self, collection: &str, ids: &[String]) -> BatchOutcome;

    /// Pushes the current document immediately and again after every change.
    fn subscribe(&self, path: &DocPath) -> Subscription<Option<Document>>;

    /// Pushes the current result set immediately and again after every change
    /// to the collection.
    fn subscribe_query(&self, collection: &str, query: &Query) -> Subscription<Vec<Document>>;
}

type Release = Box<dyn FnOnce() + Send + Sync>;

/// A live listener. Dropping it unregisters the listener from the store.
pub struct Subscription<T> {
    rx: UnboundedReceiver<Result<T, StoreError>>,
    release: Option<Release>,
}

impl<T> Subscription<T> {
    pub fn new<F>(rx: UnboundedReceiver<Result<T, StoreError>>, release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// Waits for the next push. `None` once the store has gone away.
    pub async fn next(&mut self) -> Option<Result<T, StoreError>> {
        self.rx.recv().await
    }

    /// Returns an already delivered push without waiting.
    pub fn try_next(&mut self) -> Option<Result<T, StoreError>> {
        self.rx.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<T, StoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
