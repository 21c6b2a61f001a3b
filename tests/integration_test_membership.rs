mod common;

use common::TestApp;
use wishlist_backend::domain::models::event::InvitationStatus;
use wishlist_backend::domain::services::event_service::UpdateEvent;
use wishlist_backend::error::AppError;

// --- EVENT LIFECYCLE ---

#[tokio::test]
async fn test_create_event_creator_is_sole_member() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas 2026", "u1", None)
        .await
        .unwrap();

    assert_eq!(event.created_by, "u1");
    assert_eq!(event.members, vec!["u1"]);
    assert!(event.invitations.is_empty());
}

#[tokio::test]
async fn test_create_event_requires_name() {
    let app = TestApp::new().await;

    let err = app
        .state
        .event_service
        .create_event("   ", "u1", None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_event_renames() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Birthday", "u1", None)
        .await
        .unwrap();

    let updated = app
        .state
        .event_service
        .update_event(
            &event.id,
            UpdateEvent {
                name: Some("Birthday Party".to_string()),
                event_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Birthday Party");
    assert_eq!(updated.members, vec!["u1"]);
}

#[tokio::test]
async fn test_delete_event_restricted_to_creator() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Secret Santa", "u1", None)
        .await
        .unwrap();

    let err = app
        .state
        .event_service
        .delete_event(&event.id, "u2")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    app.state
        .event_service
        .delete_event(&event.id, "u1")
        .await
        .unwrap();

    let err = app.state.event_service.get_event(&event.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- INVITATION STATE MACHINE ---

// Scenario A: invite produces one pending record, membership unchanged.
#[tokio::test]
async fn test_invite_user() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();

    let event = app
        .state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();

    assert_eq!(event.members, vec!["u1"]);
    assert_eq!(event.invitations.len(), 1);
    assert_eq!(event.invitations[0].email, "b@x.com");
    assert_eq!(event.invitations[0].status, InvitationStatus::Pending);
    assert_eq!(event.invitations[0].invited_by, "u1");
}

#[tokio::test]
async fn test_invite_unknown_event_not_found() {
    let app = TestApp::new().await;

    let err = app
        .state
        .event_service
        .invite_user("missing", "b@x.com", "u1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_invite_while_pending_conflicts() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();

    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();

    let err = app
        .state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Still exactly one record for the email.
    let event = app.state.event_service.get_event(&event.id).await.unwrap();
    assert_eq!(event.invitations.len(), 1);
}

// Scenario B: accept flips the record and adds the member in one step.
#[tokio::test]
async fn test_accept_invitation() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();

    let event = app
        .state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap();

    assert_eq!(event.members, vec!["u1", "u2"]);
    assert_eq!(event.invitations.len(), 1);
    assert_eq!(event.invitations[0].status, InvitationStatus::Accepted);
    // Creator membership invariant holds at every observable state.
    assert!(event.members.contains(&event.created_by));
}

#[tokio::test]
async fn test_accept_without_pending_invitation_not_found() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();

    let err = app
        .state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_accept_as_existing_member_conflicts() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    app.state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap();

    // A fresh invite recycles the accepted record back to pending, but the
    // user is already a member, so a second accept must refuse.
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    let err = app
        .state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_reject_invitation_and_idempotence() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();

    let event = app
        .state
        .event_service
        .reject_invitation(&event.id, "b@x.com")
        .await
        .unwrap();
    assert_eq!(event.invitations[0].status, InvitationStatus::Rejected);
    assert_eq!(event.members, vec!["u1"]);

    // Rejecting an already-settled record fails instead of double-applying.
    let err = app
        .state
        .event_service
        .reject_invitation(&event.id, "b@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_reinvite_after_reject_recycles_record_in_place() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    app.state
        .event_service
        .reject_invitation(&event.id, "b@x.com")
        .await
        .unwrap();

    let event = app
        .state
        .event_service
        .invite_user(&event.id, "b@x.com", "u3")
        .await
        .unwrap();

    // The settled record was reset, not duplicated, and carries the new
    // inviter.
    assert_eq!(event.invitations.len(), 1);
    assert_eq!(event.invitations[0].status, InvitationStatus::Pending);
    assert_eq!(event.invitations[0].invited_by, "u3");
}

// --- MEMBER REMOVAL ---

// Scenario C: removal demotes the stale accepted record so a re-invite
// goes through instead of conflicting.
#[tokio::test]
async fn test_remove_member_allows_reinvite() {
    let app = TestApp::new().await;
    app.seed_user("u2", "b@x.com", "Bea").await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    app.state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap();

    let event = app
        .state
        .event_service
        .remove_member(&event.id, "u2")
        .await
        .unwrap();
    assert_eq!(event.members, vec!["u1"]);
    assert_ne!(event.invitations[0].status, InvitationStatus::Accepted);

    let event = app
        .state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    assert_eq!(event.invitations.len(), 1);
    assert_eq!(event.invitations[0].status, InvitationStatus::Pending);
}

#[tokio::test]
async fn test_remove_creator_always_fails() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();

    let err = app
        .state
        .event_service
        .remove_member(&event.id, "u1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    let event = app.state.event_service.get_event(&event.id).await.unwrap();
    assert_eq!(event.members, vec!["u1"]);
}

#[tokio::test]
async fn test_remove_non_member_not_found() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();

    let err = app
        .state
        .event_service
        .remove_member(&event.id, "u9")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_member_without_profile_still_succeeds() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .invite_user(&event.id, "b@x.com", "u1")
        .await
        .unwrap();
    app.state
        .event_service
        .accept_invitation(&event.id, "u2", "b@x.com")
        .await
        .unwrap();

    // No profile was ever seeded for u2; invitation cleanup is skipped but
    // the removal itself must go through.
    let event = app
        .state
        .event_service
        .remove_member(&event.id, "u2")
        .await
        .unwrap();

    assert_eq!(event.members, vec!["u1"]);
    assert_eq!(event.invitations[0].status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_get_events_for_user_membership_query() {
    let app = TestApp::new().await;

    let mine = app
        .state
        .event_service
        .create_event("Mine", "u1", None)
        .await
        .unwrap();
    app.state
        .event_service
        .create_event("Theirs", "u2", None)
        .await
        .unwrap();

    let events = app
        .state
        .event_service
        .get_events_for_user("u1")
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, mine.id);
}
