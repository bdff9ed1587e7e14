use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::store::{
    document_store::{DocumentStore, Subscription},
    models::{BatchOutcome, DocPath, Document, Fields, Query, StoreError},
};

type Collection = BTreeMap<String, Fields>;

enum Listener {
    Document {
        path: DocPath,
        tx: UnboundedSender<Result<Option<Document>, StoreError>>,
    },
    Query {
        collection: String,
        query: Query,
        tx: UnboundedSender<Result<Vec<Document>, StoreError>>,
    },
}

/// Process-local document store with realtime listeners.
///
/// Every write notifies the listeners of the touched collection in the order
/// the writes complete. There is no persistence.
#[derive(Default)]
pub struct InMemoryStore {
    collections: DashMap<String, Collection>,
    listeners: Arc<DashMap<u64, Listener>>,
    next_listener: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn read(&self, path: &DocPath) -> Option<Document> {
        self.collections
            .get(&path.collection)
            .and_then(|docs| docs.get(&path.id).cloned())
            .map(|fields| Document::new(path.id.clone(), fields))
    }

    fn query(&self, collection: &str, query: &Query) -> Vec<Document> {
        match self.collections.get(collection) {
            Some(docs) => query.apply(docs.iter()),
            None => Vec::new(),
        }
    }

    /// Sends the listener the current document or result set.
    fn push_current(&self, listener: &Listener) -> bool {
        match listener {
            Listener::Document { path, tx } => tx.send(Ok(self.read(path))).is_ok(),
            Listener::Query {
                collection,
                query,
                tx,
            } => tx.send(Ok(self.query(collection, query))).is_ok(),
        }
    }

    /// Pushes fresh snapshots to every listener watching `collection`.
    /// `changed` narrows single-document listeners to the ids that were written.
    fn notify(&self, collection: &str, changed: &[&str]) {
        let mut closed = Vec::new();

        for entry in self.listeners.iter() {
            let watching = match entry.value() {
                Listener::Document { path, .. } => {
                    path.collection == collection && changed.contains(&path.id.as_str())
                }
                Listener::Query {
                    collection: target, ..
                } => target == collection,
            };

            if watching && !self.push_current(entry.value()) {
                closed.push(*entry.key());
            }
        }

        for id in closed {
            self.listeners.remove(&id);
        }
    }

    /// Registers the listener and sends its first snapshot while its registry
    /// slot is still locked. A concurrent write is either in that snapshot or
    /// notifies the listener after it.
    fn register(&self, listener: Listener) -> impl FnOnce() + Send + Sync + 'static {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        {
            let slot = self.listeners.entry(id).insert(listener);
            if !self.push_current(slot.value()) {
                warn!("Store listener {} closed before first push", id);
            }
        }
        debug!("Registered store listener {}", id);

        let listeners = Arc::downgrade(&self.listeners);
        move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.remove(&id);
                debug!("Released store listener {}", id);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        Ok(self.read(path))
    }

    async fn set(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        self.collections
            .entry(path.collection.clone())
            .or_default()
            .insert(path.id.clone(), fields);

        self.notify(&path.collection, &[&path.id]);
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        {
            let mut docs = self
                .collections
                .get_mut(&path.collection)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

            let existing = docs
                .get_mut(&path.id)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

            existing.extend(fields);
        }

        self.notify(&path.collection, &[&path.id]);
        Ok(())
    }

    async fn create(&self, path: &DocPath, fields: Fields) -> Result<(), StoreError> {
        {
            let mut docs = self.collections.entry(path.collection.clone()).or_default();
            if docs.contains_key(&path.id) {
                return Err(StoreError::AlreadyExists(path.to_string()));
            }
            docs.insert(path.id.clone(), fields);
        }

        self.notify(&path.collection, &[&path.id]);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);

        self.notify(collection, &[&id]);
        Ok(id)
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        if let Some(mut docs) = self.collections.get_mut(&path.collection) {
            docs.remove(&path.id);
        }

        self.notify(&path.collection, &[&path.id]);
        Ok(())
    }

    async fn list(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(self.query(collection, query))
    }

    async fn delete_many(&self, collection: &str, ids: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        if let Some(mut docs) = self.collections.get_mut(collection) {
            for id in ids {
                docs.remove(id);
                outcome.deleted += 1;
            }
        } else {
            outcome.deleted = ids.len();
        }

        let changed: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.notify(collection, &changed);
        outcome
    }

    fn subscribe(&self, path: &DocPath) -> Subscription<Option<Document>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let release = self.register(Listener::Document {
            path: path.clone(),
            tx,
        });
        Subscription::new(rx, release)
    }

    fn subscribe_query(&self, collection: &str, query: &Query) -> Subscription<Vec<Document>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let release = self.register(Listener::Query {
            collection: collection.to_string(),
            query: query.clone(),
            tx,
        });
        Subscription::new(rx, release)
    }
}
