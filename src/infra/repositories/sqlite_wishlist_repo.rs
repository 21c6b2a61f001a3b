use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tokio::sync::broadcast;

use super::{from_json, to_json};
use crate::domain::models::wishlist::{Wishlist, WishlistItem};
use crate::domain::ports::{ChangeKind, DocChange, WishlistRepository};
use crate::error::AppError;

#[derive(FromRow)]
struct WishlistRow {
    id: String,
    name: String,
    event_id: String,
    created_by: String,
    created_at: DateTime<Utc>,
    items: String,
}

impl WishlistRow {
    fn into_wishlist(self) -> Result<Wishlist, AppError> {
        Ok(Wishlist {
            id: self.id,
            name: self.name,
            event_id: self.event_id,
            created_by: self.created_by,
            created_at: self.created_at,
            items: from_json::<Vec<WishlistItem>>(&self.items)?,
        })
    }
}

pub struct SqliteWishlistRepo {
    pool: SqlitePool,
    changes: broadcast::Sender<DocChange>,
}

impl SqliteWishlistRepo {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { pool, changes }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "wishlists",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

#[async_trait]
impl WishlistRepository for SqliteWishlistRepo {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            r#"INSERT INTO wishlists (id, name, event_id, created_by, created_at, items)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&wishlist.id)
        .bind(&wishlist.name)
        .bind(&wishlist.event_id)
        .bind(&wishlist.created_by)
        .bind(wishlist.created_at)
        .bind(to_json(&wishlist.items)?)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let created = row.into_wishlist()?;
        self.notify(&created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Wishlist>, AppError> {
        let row = sqlx::query_as::<_, WishlistRow>("SELECT * FROM wishlists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        row.map(WishlistRow::into_wishlist).transpose()
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Wishlist>, AppError> {
        let rows = sqlx::query_as::<_, WishlistRow>("SELECT * FROM wishlists WHERE event_id = ?")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(WishlistRow::into_wishlist).collect()
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            "UPDATE wishlists SET name=?, items=? WHERE id=? RETURNING *",
        )
        .bind(&wishlist.name)
        .bind(to_json(&wishlist.items)?)
        .bind(&wishlist.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Wishlist not found".into()))?;

        let updated = row.into_wishlist()?;
        self.notify(&updated.id, ChangeKind::Updated);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM wishlists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Wishlist not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
