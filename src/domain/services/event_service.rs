use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::models::event::{Event, Invitation, InvitationStatus};
use crate::domain::ports::{EventRepository, UserRepository};
use crate::error::AppError;

#[derive(Debug, Default, Clone)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

/// Owns the event aggregate: CRUD plus the invitation/membership state
/// machine. Every mutation is a read-modify-write cycle ending in a
/// whole-document write-back.
pub struct EventService {
    event_repo: Arc<dyn EventRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl EventService {
    pub fn new(event_repo: Arc<dyn EventRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            event_repo,
            user_repo,
        }
    }

    pub async fn create_event(
        &self,
        name: &str,
        created_by: &str,
        event_date: Option<DateTime<Utc>>,
    ) -> Result<Event, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Event name is required".into()));
        }

        let event = Event::new(name.to_string(), created_by.to_string(), event_date);
        let created = self.event_repo.create(&event).await?;
        info!("Created event {} for user {}", created.id, created_by);
        Ok(created)
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Event, AppError> {
        self.event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    pub async fn get_events_for_user(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        self.event_repo.list_by_member(user_id).await
    }

    pub async fn update_event(&self, event_id: &str, patch: UpdateEvent) -> Result<Event, AppError> {
        let mut event = self.get_event(event_id).await?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Event name is required".into()));
            }
            event.name = name;
        }
        if let Some(date) = patch.event_date {
            event.event_date = Some(date);
        }

        self.event_repo.update(&event).await
    }

    /// Deletes the event document only. Wishlists and assignments that
    /// reference it are left in place (orphan-and-ignore policy).
    pub async fn delete_event(&self, event_id: &str, requested_by: &str) -> Result<(), AppError> {
        let event = self.get_event(event_id).await?;
        if event.created_by != requested_by {
            return Err(AppError::PermissionDenied(
                "Only the event creator can delete the event".into(),
            ));
        }

        self.event_repo.delete(&event.id).await?;
        info!("Deleted event {}", event_id);
        Ok(())
    }

    pub async fn invite_user(
        &self,
        event_id: &str,
        email: &str,
        invited_by: &str,
    ) -> Result<Event, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".into()));
        }

        let mut event = self.get_event(event_id).await?;

        match event.invitations.iter_mut().find(|inv| inv.email == email) {
            Some(inv) if inv.status == InvitationStatus::Pending => {
                return Err(AppError::Conflict("User is already invited".into()));
            }
            // Settled record: recycle it in place instead of growing the array.
            Some(inv) => {
                inv.status = InvitationStatus::Pending;
                inv.invited_by = invited_by.to_string();
                inv.invited_at = Utc::now();
            }
            None => {
                event.invitations.push(Invitation {
                    email: email.to_string(),
                    status: InvitationStatus::Pending,
                    invited_by: invited_by.to_string(),
                    invited_at: Utc::now(),
                });
            }
        }

        let updated = self.event_repo.update(&event).await?;
        info!("Invited {} to event {}", email, event_id);
        Ok(updated)
    }

    pub async fn accept_invitation(
        &self,
        event_id: &str,
        user_id: &str,
        email: &str,
    ) -> Result<Event, AppError> {
        let mut event = self.get_event(event_id).await?;

        let idx = event
            .invitations
            .iter()
            .position(|inv| inv.email == email && inv.status == InvitationStatus::Pending)
            .ok_or_else(|| AppError::NotFound("No pending invitation for this email".into()))?;

        if event.is_member(user_id) {
            return Err(AppError::Conflict(
                "User is already a member of this event".into(),
            ));
        }

        // Both mutations land in the same write; a half-applied state (member
        // added but invitation still pending, or the reverse) could not be
        // repaired by retrying.
        event.invitations[idx].status = InvitationStatus::Accepted;
        event.members.push(user_id.to_string());

        let updated = self.event_repo.update(&event).await?;
        info!("User {} joined event {}", user_id, event_id);
        Ok(updated)
    }

    pub async fn reject_invitation(&self, event_id: &str, email: &str) -> Result<Event, AppError> {
        let mut event = self.get_event(event_id).await?;

        let inv = event
            .invitations
            .iter_mut()
            .find(|inv| inv.email == email && inv.status == InvitationStatus::Pending)
            .ok_or_else(|| AppError::NotFound("No pending invitation for this email".into()))?;
        inv.status = InvitationStatus::Rejected;

        let updated = self.event_repo.update(&event).await?;
        info!("Invitation for {} to event {} rejected", email, event_id);
        Ok(updated)
    }

    pub async fn remove_member(&self, event_id: &str, member_id: &str) -> Result<Event, AppError> {
        let mut event = self.get_event(event_id).await?;

        if member_id == event.created_by {
            return Err(AppError::Validation(
                "The event creator cannot be removed".into(),
            ));
        }

        let before = event.members.len();
        event.members.retain(|m| m != member_id);
        if event.members.len() == before {
            return Err(AppError::NotFound("User is not a member of this event".into()));
        }

        // Best effort: demote the member's accepted invitation so a later
        // re-invite recycles it instead of finding it stale. A missing or
        // unreadable profile must not abort the removal itself.
        match self.user_repo.find_by_id(member_id).await {
            Ok(Some(profile)) => {
                if let Some(inv) = event.invitations.iter_mut().find(|inv| {
                    inv.email == profile.email && inv.status == InvitationStatus::Accepted
                }) {
                    inv.status = InvitationStatus::Rejected;
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    "Skipping invitation cleanup for removed member {}: {}",
                    member_id, err
                );
            }
        }

        let updated = self.event_repo.update(&event).await?;
        info!("Removed member {} from event {}", member_id, event_id);
        Ok(updated)
    }
}
