use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Purchased,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Purchased => "purchased",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AssignmentStatus::Pending),
            "purchased" => Ok(AssignmentStatus::Purchased),
            other => Err(format!("Unknown assignment status: {}", other)),
        }
    }
}

/// Links one wishlist to one assignee within one event. At most one
/// assignment exists per (event_id, wishlist_id, assigned_to) triple.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Assignment {
    pub id: String,
    pub event_id: String,
    pub wishlist_id: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub created_at: DateTime<Utc>,
    pub status: AssignmentStatus,
}

impl Assignment {
    pub fn new(
        event_id: String,
        wishlist_id: String,
        assigned_to: String,
        assigned_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            wishlist_id,
            assigned_to,
            assigned_by,
            created_at: Utc::now(),
            status: AssignmentStatus::Pending,
        }
    }
}
