use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AssignmentRepository, EventRepository, UserRepository, WishlistRepository,
};
use crate::domain::services::assignment_service::AssignmentService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::projections::ProjectionService;
use crate::domain::services::user_service::UserService;
use crate::domain::services::wishlist_service::WishlistService;

/// Everything the outer layers need, wired once at startup and passed in
/// explicitly. There is no module-level store client anywhere.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub wishlist_repo: Arc<dyn WishlistRepository>,
    pub assignment_repo: Arc<dyn AssignmentRepository>,
    pub user_service: Arc<UserService>,
    pub event_service: Arc<EventService>,
    pub wishlist_service: Arc<WishlistService>,
    pub assignment_service: Arc<AssignmentService>,
    pub projections: Arc<ProjectionService>,
}
