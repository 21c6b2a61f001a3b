use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::models::assignment::Assignment;
use crate::domain::models::event::{Event, Invitation, InvitationStatus};
use crate::domain::models::wishlist::Wishlist;
use crate::domain::ports::{AssignmentRepository, DocChange, EventRepository, WishlistRepository};
use crate::error::AppError;

/// One observed state of a live query. On a failed re-derivation the data
/// falls back to its default (empty set, absent document) and the error
/// rides alongside instead of the subscription silently hanging.
#[derive(Debug, Clone, Default)]
pub struct Snapshot<T> {
    pub data: T,
    pub error: Option<String>,
}

/// Handle to a running subscription. The background task re-derives the view
/// on every upstream change and publishes snapshots; dropping the handle (or
/// calling `unsubscribe`) stops it. Callers must drop on logical teardown,
/// or the listener keeps running for the life of the process.
pub struct LiveQuery<T> {
    rx: watch::Receiver<Snapshot<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> LiveQuery<T> {
    /// The most recently published snapshot.
    pub fn current(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot.
    pub async fn changed(&mut self) -> Result<Snapshot<T>, AppError> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::Internal("Subscription closed".into()))?;
        Ok(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Derives filtered push-form views over the store's change feed. Pull forms
/// of the same queries live on the entity services.
pub struct ProjectionService {
    event_repo: Arc<dyn EventRepository>,
    wishlist_repo: Arc<dyn WishlistRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
}

/// A pending invitation joined client-side with the event that holds it.
#[derive(Debug, Clone)]
pub struct PendingInvite {
    pub event_id: String,
    pub event_name: String,
    pub invitation: Invitation,
}

impl ProjectionService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        wishlist_repo: Arc<dyn WishlistRepository>,
        assignment_repo: Arc<dyn AssignmentRepository>,
    ) -> Self {
        Self {
            event_repo,
            wishlist_repo,
            assignment_repo,
        }
    }

    pub fn watch_events_for_user(&self, user_id: &str) -> LiveQuery<Vec<Event>> {
        let repo = self.event_repo.clone();
        let user_id = user_id.to_string();
        spawn_live_query(self.event_repo.changes(), |_| true, move || {
            let repo = repo.clone();
            let user_id = user_id.clone();
            async move { repo.list_by_member(&user_id).await }
        })
    }

    /// The store cannot match a predicate inside a nested array, so this
    /// scans the entire events collection and joins client-side, re-deriving
    /// the full matching set on every upstream change. O(all events) per
    /// update; acceptable at the scale this system runs at.
    pub fn watch_pending_invitations(&self, email: &str) -> LiveQuery<Vec<PendingInvite>> {
        let repo = self.event_repo.clone();
        let email = email.to_string();
        spawn_live_query(self.event_repo.changes(), |_| true, move || {
            let repo = repo.clone();
            let email = email.clone();
            async move {
                let events = repo.list_all().await?;
                let mut matches = Vec::new();
                for event in events {
                    for inv in &event.invitations {
                        if inv.email == email && inv.status == InvitationStatus::Pending {
                            matches.push(PendingInvite {
                                event_id: event.id.clone(),
                                event_name: event.name.clone(),
                                invitation: inv.clone(),
                            });
                        }
                    }
                }
                Ok(matches)
            }
        })
    }

    pub fn watch_event(&self, event_id: &str) -> LiveQuery<Option<Event>> {
        let repo = self.event_repo.clone();
        let id = event_id.to_string();
        let filter_id = id.clone();
        spawn_live_query(
            self.event_repo.changes(),
            move |change| change.doc_id == filter_id,
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.find_by_id(&id).await }
            },
        )
    }

    pub fn watch_wishlist(&self, wishlist_id: &str) -> LiveQuery<Option<Wishlist>> {
        let repo = self.wishlist_repo.clone();
        let id = wishlist_id.to_string();
        let filter_id = id.clone();
        spawn_live_query(
            self.wishlist_repo.changes(),
            move |change| change.doc_id == filter_id,
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.find_by_id(&id).await }
            },
        )
    }

    pub fn watch_wishlists_for_event(&self, event_id: &str) -> LiveQuery<Vec<Wishlist>> {
        let repo = self.wishlist_repo.clone();
        let event_id = event_id.to_string();
        spawn_live_query(self.wishlist_repo.changes(), |_| true, move || {
            let repo = repo.clone();
            let event_id = event_id.clone();
            async move { repo.list_by_event(&event_id).await }
        })
    }

    pub fn watch_assignments_for_event(&self, event_id: &str) -> LiveQuery<Vec<Assignment>> {
        let repo = self.assignment_repo.clone();
        let event_id = event_id.to_string();
        spawn_live_query(self.assignment_repo.changes(), |_| true, move || {
            let repo = repo.clone();
            let event_id = event_id.clone();
            async move { repo.list_by_event(&event_id).await }
        })
    }
}

fn spawn_live_query<T, R, F, Fut>(
    mut changes: broadcast::Receiver<DocChange>,
    relevant: R,
    query: F,
) -> LiveQuery<T>
where
    T: Clone + Default + Send + Sync + 'static,
    R: Fn(&DocChange) -> bool + Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send,
{
    let (tx, rx) = watch::channel(Snapshot::default());
    let task = tokio::spawn(async move {
        publish(&tx, query().await);
        loop {
            match changes.recv().await {
                Ok(change) if relevant(&change) => publish(&tx, query().await),
                Ok(_) => {}
                // Notifications were dropped while we lagged behind; the
                // current state is re-derived from a fresh query anyway.
                Err(broadcast::error::RecvError::Lagged(_)) => publish(&tx, query().await),
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
    LiveQuery { rx, task }
}

fn publish<T: Default>(tx: &watch::Sender<Snapshot<T>>, result: Result<T, AppError>) {
    let snapshot = match result {
        Ok(data) => Snapshot { data, error: None },
        Err(err) => {
            warn!("Live query re-derivation failed: {}", err);
            Snapshot {
                data: T::default(),
                error: Some(err.to_string()),
            }
        }
    };
    let _ = tx.send(snapshot);
}
