use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::models::event::Event;
use crate::domain::ports::{ChangeKind, DocChange, EventRepository};
use crate::error::AppError;

/// In-memory events collection. Documents are cloned out on read and
/// replaced whole on update, which preserves the last-write-wins semantics
/// of the embedded arrays exactly as the real store exhibits them.
pub struct MemoryEventRepo {
    docs: RwLock<HashMap<String, Event>>,
    changes: broadcast::Sender<DocChange>,
}

impl MemoryEventRepo {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            docs: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "events",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

impl Default for MemoryEventRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        self.docs
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        self.notify(&event.id, ChangeKind::Created);
        Ok(event.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn list_by_member(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .filter(|event| event.members.iter().any(|m| m == user_id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.docs.read().await.values().cloned().collect())
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&event.id) {
            return Err(AppError::NotFound("Event not found".into()));
        }
        docs.insert(event.id.clone(), event.clone());
        drop(docs);
        self.notify(&event.id, ChangeKind::Updated);
        Ok(event.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.docs.write().await.remove(id).is_none() {
            return Err(AppError::NotFound("Event not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
