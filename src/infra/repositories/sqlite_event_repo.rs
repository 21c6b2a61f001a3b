use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tokio::sync::broadcast;

use super::{from_json, to_json};
use crate::domain::models::event::{Event, Invitation};
use crate::domain::ports::{ChangeKind, DocChange, EventRepository};
use crate::error::AppError;

/// Row shape: `members` and `invitations` live in JSON TEXT columns and are
/// overwritten whole on every update, like any other column value.
#[derive(FromRow)]
struct EventRow {
    id: String,
    name: String,
    created_by: String,
    created_at: DateTime<Utc>,
    event_date: Option<DateTime<Utc>>,
    members: String,
    invitations: String,
}

impl EventRow {
    fn into_event(self) -> Result<Event, AppError> {
        Ok(Event {
            id: self.id,
            name: self.name,
            created_by: self.created_by,
            created_at: self.created_at,
            event_date: self.event_date,
            members: from_json::<Vec<String>>(&self.members)?,
            invitations: from_json::<Vec<Invitation>>(&self.invitations)?,
        })
    }
}

pub struct SqliteEventRepo {
    pool: SqlitePool,
    changes: broadcast::Sender<DocChange>,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { pool, changes }
    }

    fn notify(&self, doc_id: &str, kind: ChangeKind) {
        let _ = self.changes.send(DocChange {
            collection: "events",
            doc_id: doc_id.to_string(),
            kind,
        });
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"INSERT INTO events (id, name, created_by, created_at, event_date, members, invitations)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.created_by)
        .bind(event.created_at)
        .bind(event.event_date)
        .bind(to_json(&event.members)?)
        .bind(to_json(&event.invitations)?)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let created = row.into_event()?;
        self.notify(&created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        row.map(EventRow::into_event).transpose()
    }

    async fn list_by_member(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"SELECT * FROM events
               WHERE EXISTS (
                   SELECT 1 FROM json_each(events.members) WHERE json_each.value = ?
               )"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;
        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn list_all(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>("SELECT * FROM events")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"UPDATE events SET
                name=?, event_date=?, members=?, invitations=?
               WHERE id=? RETURNING *"#,
        )
        .bind(&event.name)
        .bind(event.event_date)
        .bind(to_json(&event.members)?)
        .bind(to_json(&event.invitations)?)
        .bind(&event.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        let updated = row.into_event()?;
        self.notify(&updated.id, ChangeKind::Updated);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        self.notify(id, ChangeKind::Deleted);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocChange> {
        self.changes.subscribe()
    }
}
