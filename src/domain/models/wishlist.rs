use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Embedded item inside a wishlist. Optional fields are omitted from the
/// persisted document when absent; the store rejects undefined values in
/// nested structures, so absence must never be written as null.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
}

impl WishlistItem {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: None,
            link: None,
            price: None,
            is_favorite: None,
            purchased_by: None,
            purchased_at: None,
        }
    }

    /// Drops blank optional strings so they are stored as absence, and keeps
    /// the purchase pair consistent: purchased_at never exists without
    /// purchased_by.
    pub fn sanitize(&mut self) {
        self.name = self.name.trim().to_string();
        self.description = nonblank(self.description.take());
        self.link = nonblank(self.link.take());
        self.purchased_by = nonblank(self.purchased_by.take());
        if self.purchased_by.is_none() {
            self.purchased_at = None;
        }
    }

    pub fn is_purchased(&self) -> bool {
        self.purchased_by.is_some()
    }
}

fn nonblank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Wishlist {
    pub id: String,
    pub name: String,
    pub event_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn new(name: String, event_id: String, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            event_id,
            created_by,
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }
}
