use std::sync::Arc;
use tracing::info;

use crate::domain::models::assignment::{Assignment, AssignmentStatus};
use crate::domain::ports::AssignmentRepository;
use crate::error::AppError;

/// Enforces the one-active-assignment-per-wishlist-and-assignee rule. The
/// query-then-insert check gives callers a friendly error; the repository's
/// conditional insert is what actually closes the race between concurrent
/// creators.
pub struct AssignmentService {
    assignment_repo: Arc<dyn AssignmentRepository>,
}

impl AssignmentService {
    pub fn new(assignment_repo: Arc<dyn AssignmentRepository>) -> Self {
        Self { assignment_repo }
    }

    pub async fn create_assignment(
        &self,
        event_id: &str,
        wishlist_id: &str,
        assigned_to: &str,
        assigned_by: &str,
    ) -> Result<Assignment, AppError> {
        if assigned_to == assigned_by {
            return Err(AppError::Validation(
                "A wishlist cannot be assigned to the member assigning it".into(),
            ));
        }

        if self
            .assignment_repo
            .find_by_triple(event_id, wishlist_id, assigned_to)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Assignment already exists".into()));
        }

        let assignment = Assignment::new(
            event_id.to_string(),
            wishlist_id.to_string(),
            assigned_to.to_string(),
            assigned_by.to_string(),
        );
        let created = self.assignment_repo.create(&assignment).await?;
        info!(
            "Assigned wishlist {} to user {} in event {}",
            wishlist_id, assigned_to, event_id
        );
        Ok(created)
    }

    pub async fn get_assignment(&self, assignment_id: &str) -> Result<Assignment, AppError> {
        self.assignment_repo
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".into()))
    }

    pub async fn get_assignments_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Assignment>, AppError> {
        self.assignment_repo.list_by_event(event_id).await
    }

    /// Unconditional overwrite; pending and purchased are freely
    /// interchangeable in both directions.
    pub async fn update_assignment_status(
        &self,
        assignment_id: &str,
        status: AssignmentStatus,
    ) -> Result<(), AppError> {
        self.assignment_repo
            .update_status(assignment_id, status)
            .await
    }

    pub async fn delete_assignment(&self, assignment_id: &str) -> Result<(), AppError> {
        self.assignment_repo.delete(assignment_id).await?;
        info!("Deleted assignment {}", assignment_id);
        Ok(())
    }
}
