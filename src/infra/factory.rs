use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::domain::ports::{
    AssignmentRepository, EventRepository, UserRepository, WishlistRepository,
};
use crate::domain::services::assignment_service::AssignmentService;
use crate::domain::services::event_service::EventService;
use crate::domain::services::projections::ProjectionService;
use crate::domain::services::user_service::UserService;
use crate::domain::services::wishlist_service::WishlistService;
use crate::infra::repositories::{
    memory_assignment_repo::MemoryAssignmentRepo, memory_event_repo::MemoryEventRepo,
    memory_user_repo::MemoryUserRepo, memory_wishlist_repo::MemoryWishlistRepo,
    sqlite_assignment_repo::SqliteAssignmentRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_wishlist_repo::SqliteWishlistRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    if config.database_url.starts_with("memory://") {
        info!("Initializing in-memory store...");

        build_state(
            config,
            Arc::new(MemoryUserRepo::new()),
            Arc::new(MemoryEventRepo::new()),
            Arc::new(MemoryWishlistRepo::new()),
            Arc::new(MemoryAssignmentRepo::new()),
        )
    } else {
        info!("Initializing SQLite store with WAL mode...");

        let opts = SqliteConnectOptions::from_str(&config.database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        build_state(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteWishlistRepo::new(pool.clone())),
            Arc::new(SqliteAssignmentRepo::new(pool.clone())),
        )
    }
}

fn build_state(
    config: &Config,
    user_repo: Arc<dyn UserRepository>,
    event_repo: Arc<dyn EventRepository>,
    wishlist_repo: Arc<dyn WishlistRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
) -> AppState {
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let event_service = Arc::new(EventService::new(event_repo.clone(), user_repo.clone()));
    let wishlist_service = Arc::new(WishlistService::new(
        wishlist_repo.clone(),
        assignment_repo.clone(),
    ));
    let assignment_service = Arc::new(AssignmentService::new(assignment_repo.clone()));
    let projections = Arc::new(ProjectionService::new(
        event_repo.clone(),
        wishlist_repo.clone(),
        assignment_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        user_repo,
        event_repo,
        wishlist_repo,
        assignment_repo,
        user_service,
        event_service,
        wishlist_service,
        assignment_service,
        projections,
    }
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
