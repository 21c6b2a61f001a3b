use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::models::assignment::{Assignment, AssignmentStatus};
use crate::domain::ports::{AssignmentRepository, ChangeKind, DocChange};
use crate::error::AppError;

pub struct MemoryAssignmentRepo {
    docs: RwLock<HashMap<String, Assignment>>,
    changes: broadcast::Sender<DocChange>,
}

impl MemoryAssignmentRepo {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            docs: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "assignments",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

impl Default for MemoryAssignmentRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentRepository for MemoryAssignmentRepo {
    async fn create(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        // Duplicate check and insert happen under one write lock so two
        // concurrent creators cannot both pass.
        let mut docs = self.docs.write().await;
        let duplicate = docs.values().any(|a| {
            a.event_id == assignment.event_id
                && a.wishlist_id == assignment.wishlist_id
                && a.assigned_to == assignment.assigned_to
        });
        if duplicate {
            return Err(AppError::Conflict("Assignment already exists".into()));
        }
        docs.insert(assignment.id.clone(), assignment.clone());
        drop(docs);
        self.notify(&assignment.id, ChangeKind::Created);
        Ok(assignment.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Assignment>, AppError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn find_by_triple(
        &self,
        event_id: &str,
        wishlist_id: &str,
        assigned_to: &str,
    ) -> Result<Option<Assignment>, AppError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|a| {
                a.event_id == event_id
                    && a.wishlist_id == wishlist_id
                    && a.assigned_to == assigned_to
            })
            .cloned())
    }

    async fn find_by_wishlist(&self, wishlist_id: &str) -> Result<Option<Assignment>, AppError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|a| a.wishlist_id == wishlist_id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Assignment>, AppError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: &str, status: AssignmentStatus) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        let assignment = docs
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;
        assignment.status = status;
        drop(docs);
        self.notify(id, ChangeKind::Updated);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.docs.write().await.remove(id).is_none() {
            return Err(AppError::NotFound("Assignment not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
