pub mod memory_assignment_repo;
pub mod memory_event_repo;
pub mod memory_user_repo;
pub mod memory_wishlist_repo;

pub mod sqlite_assignment_repo;
pub mod sqlite_event_repo;
pub mod sqlite_user_repo;
pub mod sqlite_wishlist_repo;

use crate::error::AppError;

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(format!("Could not serialize document field: {}", e)))
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Corrupt document field: {}", e)))
}
