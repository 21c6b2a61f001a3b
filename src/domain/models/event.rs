use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// One invitation record inside an event. Settled records (accepted or
/// rejected) are recycled in place by a later re-invite instead of being
/// duplicated, so the array never holds two records for the same email.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invitation {
    pub email: String,
    pub status: InvitationStatus,
    pub invited_by: String,
    pub invited_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<DateTime<Utc>>,
    pub members: Vec<String>,
    pub invitations: Vec<Invitation>,
}

impl Event {
    pub fn new(name: String, created_by: String, event_date: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            members: vec![created_by.clone()],
            created_by,
            created_at: Utc::now(),
            event_date,
            invitations: Vec::new(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}
