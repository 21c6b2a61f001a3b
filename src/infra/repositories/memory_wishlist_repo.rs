use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::domain::models::wishlist::Wishlist;
use crate::domain::ports::{ChangeKind, DocChange, WishlistRepository};
use crate::error::AppError;

pub struct MemoryWishlistRepo {
    docs: RwLock<HashMap<String, Wishlist>>,
    changes: broadcast::Sender<DocChange>,
}

impl MemoryWishlistRepo {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            docs: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "wishlists",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

impl Default for MemoryWishlistRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WishlistRepository for MemoryWishlistRepo {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        self.docs
            .write()
            .await
            .insert(wishlist.id.clone(), wishlist.clone());
        self.notify(&wishlist.id, ChangeKind::Created);
        Ok(wishlist.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Wishlist>, AppError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Wishlist>, AppError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .filter(|w| w.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&wishlist.id) {
            return Err(AppError::NotFound("Wishlist not found".into()));
        }
        docs.insert(wishlist.id.clone(), wishlist.clone());
        drop(docs);
        self.notify(&wishlist.id, ChangeKind::Updated);
        Ok(wishlist.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.docs.write().await.remove(id).is_none() {
            return Err(AppError::NotFound("Wishlist not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
