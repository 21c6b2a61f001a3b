mod common;

use common::TestApp;
use wishlist_backend::domain::models::assignment::{Assignment, AssignmentStatus};
use wishlist_backend::domain::services::wishlist_service::ItemDraft;
use wishlist_backend::error::AppError;

// Scenario D: the second identical assignment is refused.
#[tokio::test]
async fn test_duplicate_assignment_conflicts() {
    let app = TestApp::new().await;

    app.state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap();

    let err = app
        .state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_self_assignment_rejected() {
    let app = TestApp::new().await;

    let err = app
        .state
        .assignment_service
        .create_assignment("e1", "w1", "u1", "u1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

// The uniqueness constraint lives in the store itself, not only in the
// service's pre-check: inserting the same triple directly must also fail.
#[tokio::test]
async fn test_store_enforces_triple_uniqueness() {
    let app = TestApp::new().await;

    let first = Assignment::new("e1".into(), "w1".into(), "u2".into(), "u1".into());
    let second = Assignment::new("e1".into(), "w1".into(), "u2".into(), "u3".into());

    app.state.assignment_repo.create(&first).await.unwrap();
    let err = app.state.assignment_repo.create(&second).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_same_wishlist_different_assignee_allowed() {
    let app = TestApp::new().await;

    app.state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap();
    app.state
        .assignment_service
        .create_assignment("e1", "w2", "u3", "u1")
        .await
        .unwrap();

    let assignments = app
        .state
        .assignment_service
        .get_assignments_for_event("e1")
        .await
        .unwrap();
    assert_eq!(assignments.len(), 2);
}

#[tokio::test]
async fn test_update_status_is_freely_bidirectional() {
    let app = TestApp::new().await;

    let assignment = app
        .state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Pending);

    app.state
        .assignment_service
        .update_assignment_status(&assignment.id, AssignmentStatus::Purchased)
        .await
        .unwrap();
    app.state
        .assignment_service
        .update_assignment_status(&assignment.id, AssignmentStatus::Pending)
        .await
        .unwrap();

    let fetched = app
        .state
        .assignment_service
        .get_assignment(&assignment.id)
        .await
        .unwrap();
    assert_eq!(fetched.status, AssignmentStatus::Pending);
}

#[tokio::test]
async fn test_delete_assignment() {
    let app = TestApp::new().await;

    let assignment = app
        .state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap();

    app.state
        .assignment_service
        .delete_assignment(&assignment.id)
        .await
        .unwrap();

    let err = app
        .state
        .assignment_service
        .get_assignment(&assignment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Deleting an assignment frees the triple for re-creation.
    app.state
        .assignment_service
        .create_assignment("e1", "w1", "u2", "u1")
        .await
        .unwrap();
}

// Scenario E: the wishlist's assignment mirrors the purchase state in both
// directions.
#[tokio::test]
async fn test_assignment_mirrors_item_purchase_state() {
    let app = TestApp::new().await;

    let event = app
        .state
        .event_service
        .create_event("Christmas", "u1", None)
        .await
        .unwrap();
    let wishlist = app
        .state
        .wishlist_service
        .create_wishlist("For Dad", &event.id, "u1")
        .await
        .unwrap();
    let wishlist = app
        .state
        .wishlist_service
        .add_item(
            &wishlist.id,
            ItemDraft {
                name: "Socks".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let item_id = wishlist.items[0].id.clone();

    let assignment = app
        .state
        .assignment_service
        .create_assignment(&event.id, &wishlist.id, "u2", "u1")
        .await
        .unwrap();

    app.state
        .wishlist_service
        .mark_item_purchased(&wishlist.id, &item_id, "u2")
        .await
        .unwrap();
    let fetched = app
        .state
        .assignment_service
        .get_assignment(&assignment.id)
        .await
        .unwrap();
    assert_eq!(fetched.status, AssignmentStatus::Purchased);

    app.state
        .wishlist_service
        .unmark_item_purchased(&wishlist.id, &item_id)
        .await
        .unwrap();
    let fetched = app
        .state
        .assignment_service
        .get_assignment(&assignment.id)
        .await
        .unwrap();
    assert_eq!(fetched.status, AssignmentStatus::Pending);
}
