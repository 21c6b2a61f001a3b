use crate::domain::models::{
    assignment::{Assignment, AssignmentStatus},
    event::Event,
    user::User,
    wishlist::Wishlist,
};
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Notification fanned out by a repository after every successful write.
/// Subscribers re-derive their views from fresh queries; the change itself
/// carries only enough to decide relevance.
#[derive(Debug, Clone)]
pub struct DocChange {
    pub collection: &'static str,
    pub doc_id: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

/// Events are written back whole: `members` and `invitations` are replaced
/// as entire values on update, never merged. Concurrent read-modify-write
/// cycles therefore resolve as last-write-wins at the document level.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_by_member(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    async fn list_all(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    fn changes(&self) -> broadcast::Receiver<DocChange>;
}

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Wishlist>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Wishlist>, AppError>;
    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    fn changes(&self) -> broadcast::Receiver<DocChange>;
}

/// `create` must enforce the (event_id, wishlist_id, assigned_to) uniqueness
/// atomically and answer Conflict on a duplicate; callers' pre-checks are a
/// courtesy, not the guarantee.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: &Assignment) -> Result<Assignment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Assignment>, AppError>;
    async fn find_by_triple(
        &self,
        event_id: &str,
        wishlist_id: &str,
        assigned_to: &str,
    ) -> Result<Option<Assignment>, AppError>;
    async fn find_by_wishlist(&self, wishlist_id: &str) -> Result<Option<Assignment>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Assignment>, AppError>;
    async fn update_status(&self, id: &str, status: AssignmentStatus) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    fn changes(&self) -> broadcast::Receiver<DocChange>;
}
