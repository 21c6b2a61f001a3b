use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::assignment::AssignmentStatus;
use crate::domain::models::wishlist::{Wishlist, WishlistItem};
use crate::domain::ports::{AssignmentRepository, WishlistRepository};
use crate::error::AppError;

#[derive(Debug, Default, Clone)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub price: Option<f64>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Default, Clone)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub price: Option<f64>,
    pub is_favorite: Option<bool>,
}

/// Owns the wishlist aggregate and its embedded item list. The store has no
/// primitive for touching one element of a nested array, so every item
/// operation fetches the document, rebuilds the items array and writes the
/// whole array back.
pub struct WishlistService {
    wishlist_repo: Arc<dyn WishlistRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
}

impl WishlistService {
    pub fn new(
        wishlist_repo: Arc<dyn WishlistRepository>,
        assignment_repo: Arc<dyn AssignmentRepository>,
    ) -> Self {
        Self {
            wishlist_repo,
            assignment_repo,
        }
    }

    pub async fn create_wishlist(
        &self,
        name: &str,
        event_id: &str,
        created_by: &str,
    ) -> Result<Wishlist, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Wishlist name is required".into()));
        }

        let wishlist = Wishlist::new(name.to_string(), event_id.to_string(), created_by.to_string());
        let created = self.wishlist_repo.create(&wishlist).await?;
        info!("Created wishlist {} in event {}", created.id, event_id);
        Ok(created)
    }

    pub async fn get_wishlist(&self, wishlist_id: &str) -> Result<Wishlist, AppError> {
        self.wishlist_repo
            .find_by_id(wishlist_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Wishlist not found".into()))
    }

    pub async fn get_wishlists_for_event(&self, event_id: &str) -> Result<Vec<Wishlist>, AppError> {
        self.wishlist_repo.list_by_event(event_id).await
    }

    pub async fn update_wishlist(&self, wishlist_id: &str, name: &str) -> Result<Wishlist, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Wishlist name is required".into()));
        }

        let mut wishlist = self.get_wishlist(wishlist_id).await?;
        wishlist.name = name.to_string();
        self.wishlist_repo.update(&wishlist).await
    }

    pub async fn delete_wishlist(&self, wishlist_id: &str) -> Result<(), AppError> {
        self.wishlist_repo.delete(wishlist_id).await?;
        info!("Deleted wishlist {}", wishlist_id);
        Ok(())
    }

    pub async fn add_item(&self, wishlist_id: &str, draft: ItemDraft) -> Result<Wishlist, AppError> {
        if draft.name.trim().is_empty() {
            return Err(AppError::Validation("Item name is required".into()));
        }

        let mut wishlist = self.get_wishlist(wishlist_id).await?;
        // Legacy records may carry blank optional fields; everything written
        // back gets re-cleaned, not just the new item.
        for item in &mut wishlist.items {
            item.sanitize();
        }

        let mut item = WishlistItem::new(draft.name);
        item.description = draft.description;
        item.link = draft.link;
        item.price = draft.price;
        item.is_favorite = draft.is_favorite;
        item.sanitize();
        wishlist.items.push(item);

        let updated = self.wishlist_repo.update(&wishlist).await?;
        info!("Added item to wishlist {}", wishlist_id);
        Ok(updated)
    }

    pub async fn update_item(
        &self,
        wishlist_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<Wishlist, AppError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Item name is required".into()));
            }
        }

        self.mutate_item(wishlist_id, item_id, move |item| {
            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(description) = patch.description {
                item.description = Some(description);
            }
            if let Some(link) = patch.link {
                item.link = Some(link);
            }
            if let Some(price) = patch.price {
                item.price = Some(price);
            }
            if let Some(is_favorite) = patch.is_favorite {
                item.is_favorite = Some(is_favorite);
            }
        })
        .await
    }

    pub async fn delete_item(&self, wishlist_id: &str, item_id: &str) -> Result<Wishlist, AppError> {
        let mut wishlist = self.get_wishlist(wishlist_id).await?;
        for item in &mut wishlist.items {
            item.sanitize();
        }
        wishlist.items.retain(|item| item.id != item_id);

        let updated = self.wishlist_repo.update(&wishlist).await?;
        info!("Deleted item {} from wishlist {}", item_id, wishlist_id);
        Ok(updated)
    }

    /// Re-emits the stored items in the caller-supplied order. The id list
    /// must be a permutation of the current item ids; anything else is
    /// rejected so a reorder can never drop, duplicate or invent items.
    pub async fn reorder_items(
        &self,
        wishlist_id: &str,
        ordered_ids: &[String],
    ) -> Result<Wishlist, AppError> {
        let mut wishlist = self.get_wishlist(wishlist_id).await?;

        if ordered_ids.len() != wishlist.items.len() {
            return Err(AppError::Validation(
                "Reorder must reference every item exactly once".into(),
            ));
        }

        let mut remaining = std::mem::take(&mut wishlist.items);
        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            let pos = remaining
                .iter()
                .position(|item| &item.id == id)
                .ok_or_else(|| {
                    AppError::Validation(format!("Unknown or duplicate item id in reorder: {}", id))
                })?;
            let mut item = remaining.swap_remove(pos);
            item.sanitize();
            reordered.push(item);
        }
        wishlist.items = reordered;

        self.wishlist_repo.update(&wishlist).await
    }

    pub async fn mark_item_purchased(
        &self,
        wishlist_id: &str,
        item_id: &str,
        purchased_by: &str,
    ) -> Result<Wishlist, AppError> {
        let purchased_by = purchased_by.to_string();
        let updated = self
            .mutate_item(wishlist_id, item_id, move |item| {
                item.purchased_by = Some(purchased_by);
                item.purchased_at = Some(Utc::now());
            })
            .await?;

        self.mirror_assignment_status(wishlist_id, AssignmentStatus::Purchased)
            .await;
        info!("Marked item {} purchased in wishlist {}", item_id, wishlist_id);
        Ok(updated)
    }

    pub async fn unmark_item_purchased(
        &self,
        wishlist_id: &str,
        item_id: &str,
    ) -> Result<Wishlist, AppError> {
        let updated = self
            .mutate_item(wishlist_id, item_id, |item| {
                item.purchased_by = None;
                item.purchased_at = None;
            })
            .await?;

        self.mirror_assignment_status(wishlist_id, AssignmentStatus::Pending)
            .await;
        info!(
            "Unmarked item {} purchased in wishlist {}",
            item_id, wishlist_id
        );
        Ok(updated)
    }

    async fn mutate_item<F>(
        &self,
        wishlist_id: &str,
        item_id: &str,
        apply: F,
    ) -> Result<Wishlist, AppError>
    where
        F: FnOnce(&mut WishlistItem),
    {
        let mut wishlist = self.get_wishlist(wishlist_id).await?;
        for item in &mut wishlist.items {
            item.sanitize();
        }

        let item = wishlist
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| AppError::NotFound("Wishlist item not found".into()))?;
        apply(item);
        item.sanitize();

        self.wishlist_repo.update(&wishlist).await
    }

    /// The wishlist's assignment mirrors its purchase state. This is
    /// secondary bookkeeping: a failure here is logged and swallowed, never
    /// surfaced to the item mutation that triggered it.
    async fn mirror_assignment_status(&self, wishlist_id: &str, status: AssignmentStatus) {
        let result: Result<(), AppError> = async {
            match self.assignment_repo.find_by_wishlist(wishlist_id).await? {
                Some(assignment) => {
                    self.assignment_repo
                        .update_status(&assignment.id, status)
                        .await
                }
                None => Ok(()),
            }
        }
        .await;

        if let Err(err) = result {
            warn!(
                "Could not mirror purchase state to assignment for wishlist {}: {}",
                wishlist_id, err
            );
        }
    }
}
