use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::user::User;
use crate::domain::ports::UserRepository;
use crate::error::AppError;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Creates the denormalized profile on first sign-in if it does not
    /// exist yet.
    pub async fn ensure_profile(
        &self,
        uid: &str,
        email: &str,
        display_name: &str,
    ) -> Result<User, AppError> {
        if let Some(existing) = self.user_repo.find_by_id(uid).await? {
            return Ok(existing);
        }

        let user = User::new(uid.to_string(), email.to_string(), display_name.to_string());
        let created = self.user_repo.create(&user).await?;
        info!("Created profile for user {}", uid);
        Ok(created)
    }

    /// A store-side permission rejection degrades to "no profile"; every
    /// other failure propagates.
    pub async fn get_user_data(&self, uid: &str) -> Result<Option<User>, AppError> {
        match self.user_repo.find_by_id(uid).await {
            Ok(user) => Ok(user),
            Err(AppError::PermissionDenied(msg)) => {
                warn!("Profile read denied for {}: {}", uid, msg);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
