use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::models::user::User;
use crate::domain::ports::UserRepository;
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryUserRepo {
    docs: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        self.docs
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.docs.read().await.get(id).cloned())
    }
}
