use async_trait::async_trait;
use wishlist_backend::{
    config::Config,
    domain::models::user::User,
    domain::ports::UserRepository,
    error::AppError,
    infra::factory::bootstrap_state,
    state::AppState,
};

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config {
            database_url: "memory://".to_string(),
            log_dir: "./logs".to_string(),
        };
        let state = bootstrap_state(&config).await;
        Self { state }
    }

    /// Seeds a denormalized profile so best-effort email lookups resolve.
    #[allow(dead_code)]
    pub async fn seed_user(&self, id: &str, email: &str, display_name: &str) -> User {
        self.state
            .user_service
            .ensure_profile(id, email, display_name)
            .await
            .expect("Failed to seed user profile")
    }
}

/// UserRepository that refuses every access, for exercising the
/// permission-denied degradation paths.
#[allow(dead_code)]
pub struct DeniedUserRepo;

#[async_trait]
impl UserRepository for DeniedUserRepo {
    async fn create(&self, _user: &User) -> Result<User, AppError> {
        Err(AppError::PermissionDenied(
            "users collection is locked".into(),
        ))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<User>, AppError> {
        Err(AppError::PermissionDenied(
            "users collection is locked".into(),
        ))
    }
}
