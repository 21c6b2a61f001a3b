use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tokio::sync::broadcast;

use crate::domain::models::assignment::{Assignment, AssignmentStatus};
use crate::domain::ports::{AssignmentRepository, ChangeKind, DocChange};
use crate::error::AppError;

#[derive(FromRow)]
struct AssignmentRow {
    id: String,
    event_id: String,
    wishlist_id: String,
    assigned_to: String,
    assigned_by: String,
    created_at: DateTime<Utc>,
    status: String,
}

impl AssignmentRow {
    fn into_assignment(self) -> Result<Assignment, AppError> {
        Ok(Assignment {
            status: self.status.parse().map_err(AppError::Internal)?,
            id: self.id,
            event_id: self.event_id,
            wishlist_id: self.wishlist_id,
            assigned_to: self.assigned_to,
            assigned_by: self.assigned_by,
            created_at: self.created_at,
        })
    }
}

pub struct SqliteAssignmentRepo {
    pool: SqlitePool,
    changes: broadcast::Sender<DocChange>,
}

impl SqliteAssignmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { pool, changes }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "assignments",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepo {
    async fn create(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"INSERT INTO assignments (id, event_id, wishlist_id, assigned_to, assigned_by, created_at, status)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&assignment.id)
        .bind(&assignment.event_id)
        .bind(&assignment.wishlist_id)
        .bind(&assignment.assigned_to)
        .bind(&assignment.assigned_by)
        .bind(assignment.created_at)
        .bind(assignment.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // 2067 = SQLite unique constraint violation; the
                // (event_id, wishlist_id, assigned_to) index is what closes
                // the check-then-insert race.
                if db_err.code().unwrap_or_default() == "2067" {
                    return AppError::Conflict("Assignment already exists".into());
                }
            }
            AppError::Database(e)
        })?;

        let created = row.into_assignment()?;
        self.notify(&created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query_as::<_, AssignmentRow>("SELECT * FROM assignments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn find_by_triple(
        &self,
        event_id: &str,
        wishlist_id: &str,
        assigned_to: &str,
    ) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT * FROM assignments WHERE event_id = ? AND wishlist_id = ? AND assigned_to = ?",
        )
        .bind(event_id)
        .bind(wishlist_id)
        .bind(assigned_to)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn find_by_wishlist(&self, wishlist_id: &str) -> Result<Option<Assignment>, AppError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT * FROM assignments WHERE wishlist_id = ? LIMIT 1",
        )
        .bind(wishlist_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Assignment>, AppError> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            "SELECT * FROM assignments WHERE event_id = ?",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;
        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }

    async fn update_status(&self, id: &str, status: AssignmentStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE assignments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Assignment not found".into()));
        }
        self.notify(id, ChangeKind::Updated);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Assignment not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
