use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tracing::level_filters::LevelFilter;

use crate::{
    auth::models::Identity,
    client::{
        image_host_client::{HostedImage, ImageHost},
        image_host_error::ImageHostError,
    },
    store::{
        document_store::{DocumentStore, Subscription},
        memory::InMemoryStore,
        models::{BatchOutcome, DocPath, Document, Fields, Query, StoreError},
    },
};

pub fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn admin() -> Identity {
    Identity::admin("admin-uid")
}

pub fn guest(id: &str) -> Identity {
    Identity::guest(id)
}

pub fn memory_store() -> (Arc<InMemoryStore>, Arc<dyn DocumentStore>) {
    let store = Arc::new(InMemoryStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();
    (store, shared)
}

/// Lets spawned fire-and-forget tasks run on the test runtime.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// In-memory store with switchable failures.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryStore,
    /// Every write fails with a transport error.
    pub fail_writes: AtomicBool,
    /// Updates that set `vetted` fail.
    pub fail_approval: AtomicBool,
    /// Ids that `delete_many` refuses to delete.
    pub fail_delete_ids: Mutex<HashSet<String>>,
}

impl FaultyStore {
    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("network unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.set(path, fields).await
    }

    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        self.check_write()?;
        if self.fail_approval.load(Ordering::SeqCst) && fields.contains_key("vetted") {
            return Err(StoreError::Transport("connection reset".into()));
        }
        self.inner.update(path, fields).await
    }

    async fn create(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.create(path, fields).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.check_write()?;
        self.inner.add(collection, fields).await
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.delete(path).await
    }

    async fn list(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection, query).await
    }

    async fn delete_many(&self, collection: &str, ids: &[String]) -> BatchOutcome {
        let refused = self.fail_delete_ids.lock().unwrap().clone();
        let (failed, allowed): (Vec<String>, Vec<String>) =
            ids.iter().cloned().partition(|id| refused.contains(id));

        let mut outcome = self.inner.delete_many(collection, &allowed).await;
        outcome.failed.extend(failed);
        outcome
    }

    fn subscribe(&self, path: &DocPath) -> Subscription<Option<Document>> {
        self.inner.subscribe(path)
    }

    fn subscribe_query(&self, collection: &str, query: &Query) -> Subscription<Vec<Document>> {
        self.inner.subscribe_query(collection, query)
    }
}

#[derive(Default)]
pub struct FakeImageHost {
    pub uploads: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, file: &str) -> Result<HostedImage, ImageHostError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ImageHostError::NotConfigured("upload disabled".into()));
        }
        assert!(!file.is_empty(), "uploaded an empty file");

        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(HostedImage {
            hosted_url: format!("https://img.example.com/wedding/{}.jpg", n),
            hosted_id: format!("wedding/{}", n),
        })
    }
}
