use super::*;
use crate::db::DbService;
use crate::db::models::{
    Admin, Customer, DiningTableCreate, LocationCreate, ReservationCreate, ReservationUpdate,
    StatusUpdateRequest,
};
use crate::db::repository::{
    AdminRepository, DiningTableRepository, LocationRepository, NotificationRepository,
};
use crate::notifications::{NoopPushGateway, NotificationDispatcher};
use chrono::NaiveDate;
use shared::{
    AdminRole, NotificationType, ReservationStatus, ReservationType, TableZone, TimeSlot,
};
use std::sync::Arc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

struct TestEnv {
    manager: ReservationManager,
    db: Surreal<Db>,
    location: RecordId,
    tables: Vec<RecordId>,
    admin: RecordId,
}

async fn test_env() -> TestEnv {
    let db = DbService::memory().await.unwrap().db;
    let dispatcher = Arc::new(NotificationDispatcher::new(
        db.clone(),
        Arc::new(NoopPushGateway),
    ));
    let manager = ReservationManager::new(db.clone(), dispatcher);

    let location = LocationRepository::new(db.clone())
        .create(LocationCreate {
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
            phone: None,
            total_tables: Some(2),
            max_capacity: Some(12),
        })
        .await
        .unwrap();
    let location = location.id.unwrap();

    let table_repo = DiningTableRepository::new(db.clone());
    let mut tables = Vec::new();
    for number in ["T1", "T2"] {
        let table = table_repo
            .create(DiningTableCreate {
                location: location.clone(),
                number: number.to_string(),
                seats: Some(4),
                zone: TableZone::MainHall,
            })
            .await
            .unwrap();
        tables.push(table.id.unwrap());
    }

    let admin = AdminRepository::new(db.clone())
        .create(crate::db::models::AdminCreate {
            username: "tester".to_string(),
            password: "test-password".to_string(),
            display_name: None,
            role: AdminRole::Manager,
            locations: vec![],
        })
        .await
        .unwrap();
    let admin = admin.id.unwrap();

    TestEnv {
        manager,
        db,
        location,
        tables,
        admin,
    }
}

fn customer() -> Customer {
    Customer {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: "+34600111222".to_string(),
        email: None,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn table_booking(env: &TestEnv, tables: &[RecordId], start: &str, end: &str) -> ReservationCreate {
    ReservationCreate {
        location: env.location.clone(),
        kind: ReservationType::Table,
        tables: tables.to_vec(),
        customer: customer(),
        date: date(),
        time_slot: TimeSlot::new(start, end),
        guests: 2,
        event_details: None,
    }
}

fn event_booking(env: &TestEnv, start: &str, end: &str) -> ReservationCreate {
    ReservationCreate {
        location: env.location.clone(),
        kind: ReservationType::Event,
        tables: vec![],
        customer: customer(),
        date: date(),
        time_slot: TimeSlot::new(start, end),
        guests: 30,
        event_details: Some("Birthday party".to_string()),
    }
}

async fn notifications(db: &Surreal<Db>) -> Vec<crate::db::models::Notification> {
    db.query("SELECT * FROM notification ORDER BY created_at")
        .await
        .unwrap()
        .take(0)
        .unwrap()
}

// ========================================================================
// Creation and conflicts
// ========================================================================

#[tokio::test]
async fn create_pending_with_single_history_entry() {
    let env = test_env().await;

    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.status_history.len(), 1);
    assert_eq!(
        reservation.status_history[0].status,
        ReservationStatus::Pending
    );
    assert!(reservation.status_history[0].changed_by.is_none());
    assert!(reservation.id.is_some());
}

#[tokio::test]
async fn overlapping_create_conflicts_and_names_the_table() {
    let env = test_env().await;
    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    let err = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "19:00", "21:00"), None)
        .await
        .unwrap_err();

    match err {
        ReservationError::TableConflict { occupied } => {
            assert_eq!(occupied, vec![env.tables[0].to_string()]);
        }
        other => panic!("expected TableConflict, got {:?}", other),
    }
}

#[tokio::test]
async fn back_to_back_windows_do_not_conflict() {
    let env = test_env().await;
    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    // [18:00, 20:00) and [20:00, 22:00) touch but do not overlap
    env.manager
        .create(table_booking(&env, &env.tables[..1], "20:00", "22:00"), None)
        .await
        .unwrap();

    // A different table inside the busy window is also fine
    env.manager
        .create(table_booking(&env, &env.tables[1..2], "18:30", "19:30"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_reservation_never_blocks() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    env.manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Cancelled,
                reason: Some("Customer called".to_string()),
            },
            &env.admin,
        )
        .await
        .unwrap();

    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:30", "20:30"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn validation_rejects_bad_input() {
    let env = test_env().await;

    // start == end
    let mut input = table_booking(&env, &env.tables[..1], "18:00", "18:00");
    assert!(matches!(
        env.manager.create(input, None).await.unwrap_err(),
        ReservationError::Validation(_)
    ));

    // table kind without tables
    input = table_booking(&env, &[], "18:00", "20:00");
    assert!(matches!(
        env.manager.create(input, None).await.unwrap_err(),
        ReservationError::Validation(_)
    ));

    // zero guests
    input = table_booking(&env, &env.tables[..1], "18:00", "20:00");
    input.guests = 0;
    assert!(matches!(
        env.manager.create(input, None).await.unwrap_err(),
        ReservationError::Validation(_)
    ));

    // table from another venue
    input = table_booking(&env, &env.tables[..1], "18:00", "20:00");
    input.tables = vec!["dining_table:nowhere".parse().unwrap()];
    assert!(matches!(
        env.manager.create(input, None).await.unwrap_err(),
        ReservationError::Validation(_)
    ));
}

#[tokio::test]
async fn unknown_location_is_not_found() {
    let env = test_env().await;
    let mut input = table_booking(&env, &env.tables[..1], "18:00", "20:00");
    input.location = "location:ghost".parse().unwrap();

    assert!(matches!(
        env.manager.create(input, None).await.unwrap_err(),
        ReservationError::Repo(crate::db::repository::RepoError::NotFound(_))
    ));
}

// ========================================================================
// Whole-venue reservations
// ========================================================================

#[tokio::test]
async fn event_occupies_every_table() {
    let env = test_env().await;
    env.manager
        .create(event_booking(&env, "18:00", "22:00"), None)
        .await
        .unwrap();

    let availability = AvailabilityChecker::new(env.db.clone())
        .check(&env.location, date(), &TimeSlot::new("19:00", "20:00"), None)
        .await
        .unwrap();
    assert!(availability.available.is_empty());
    assert_eq!(availability.occupied.len(), 2);

    // Table booking inside the event window conflicts
    let err = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "19:00", "20:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::TableConflict { .. }));
}

#[tokio::test]
async fn overlapping_events_double_book_the_venue() {
    let env = test_env().await;
    env.manager
        .create(event_booking(&env, "18:00", "22:00"), None)
        .await
        .unwrap();

    let err = env
        .manager
        .create(event_booking(&env, "20:00", "23:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::VenueConflict));

    // A later evening slot is fine
    env.manager
        .create(event_booking(&env, "22:00", "23:30"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn event_creation_ignores_table_level_occupancy() {
    let env = test_env().await;
    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    // Per the booking rules, a whole-venue request is only checked
    // against other whole-venue reservations
    env.manager
        .create(event_booking(&env, "18:00", "22:00"), None)
        .await
        .unwrap();
}

// ========================================================================
// Availability partition
// ========================================================================

#[tokio::test]
async fn availability_partitions_tables() {
    let env = test_env().await;
    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    let checker = AvailabilityChecker::new(env.db.clone());
    let availability = checker
        .check(&env.location, date(), &TimeSlot::new("18:30", "19:30"), None)
        .await
        .unwrap();

    let occupied: Vec<String> = availability
        .occupied
        .iter()
        .map(|t| t.number.clone())
        .collect();
    let available: Vec<String> = availability
        .available
        .iter()
        .map(|t| t.number.clone())
        .collect();
    assert_eq!(occupied, vec!["T1"]);
    assert_eq!(available, vec!["T2"]);

    // Outside the window both tables are free
    let availability = checker
        .check(&env.location, date(), &TimeSlot::new("20:00", "21:00"), None)
        .await
        .unwrap();
    assert_eq!(availability.available.len(), 2);
    assert!(availability.occupied.is_empty());

    // Invalid window is rejected
    let err = checker
        .check(&env.location, date(), &TimeSlot::new("20:00", "20:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));
}

// ========================================================================
// Status machine
// ========================================================================

#[tokio::test]
async fn confirm_appends_history_and_sets_confirmed_by() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    let confirmed = env
        .manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Confirmed,
                reason: None,
            },
            &env.admin,
        )
        .await
        .unwrap();

    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert_eq!(confirmed.status_history.len(), 2);
    assert_eq!(
        confirmed.status_history.last().unwrap().status,
        confirmed.status
    );
    assert_eq!(confirmed.confirmed_by, Some(env.admin.clone()));
    assert!(confirmed.confirmed_at.is_some());
    assert_eq!(confirmed.updated_by, Some(env.admin.clone()));
}

#[tokio::test]
async fn terminal_states_reject_every_transition() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    for status in [ReservationStatus::Confirmed, ReservationStatus::Completed] {
        env.manager
            .update_status(
                &id,
                StatusUpdateRequest {
                    status,
                    reason: None,
                },
                &env.admin,
            )
            .await
            .unwrap();
    }

    // completed -> anything fails, including back to pending
    for target in [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
    ] {
        let err = env
            .manager
            .update_status(
                &id,
                StatusUpdateRequest {
                    status: target,
                    reason: None,
                },
                &env.admin,
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, ReservationError::InvalidTransition { .. }),
            "transition to {:?} should fail",
            target
        );
    }
}

#[tokio::test]
async fn same_state_transition_is_rejected() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    let err = env
        .manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Pending,
                reason: None,
            },
            &env.admin,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReservationError::InvalidTransition {
            from: ReservationStatus::Pending,
            to: ReservationStatus::Pending,
        }
    ));
}

#[tokio::test]
async fn history_is_append_only_across_the_lifecycle() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();
    let mut last_len = 1;

    for status in [ReservationStatus::Confirmed, ReservationStatus::Cancelled] {
        let updated = env
            .manager
            .update_status(
                &id,
                StatusUpdateRequest {
                    status,
                    reason: None,
                },
                &env.admin,
            )
            .await
            .unwrap();
        assert_eq!(updated.status_history.len(), last_len + 1);
        assert_eq!(updated.status_history.last().unwrap().status, status);
        // Earlier entries are untouched
        assert_eq!(
            updated.status_history[0].status,
            ReservationStatus::Pending
        );
        last_len = updated.status_history.len();
    }
}

// ========================================================================
// Updates / reschedules
// ========================================================================

#[tokio::test]
async fn reschedule_rechecks_availability_excluding_self() {
    let env = test_env().await;
    let first = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    env.manager
        .create(table_booking(&env, &env.tables[..1], "20:00", "22:00"), None)
        .await
        .unwrap();
    let id = first.id.unwrap().to_string();

    // Shrinking inside its own window must not collide with itself
    let patch = ReservationUpdate {
        time_slot: Some(TimeSlot::new("18:30", "19:30")),
        ..Default::default()
    };
    let updated = env.manager.update(&id, patch, &env.admin).await.unwrap();
    assert_eq!(updated.time_slot, TimeSlot::new("18:30", "19:30"));
    assert_eq!(updated.updated_by, Some(env.admin.clone()));

    // Moving onto the second reservation's window conflicts
    let patch = ReservationUpdate {
        time_slot: Some(TimeSlot::new("20:30", "21:30")),
        ..Default::default()
    };
    let err = env.manager.update(&id, patch, &env.admin).await.unwrap_err();
    assert!(matches!(err, ReservationError::TableConflict { .. }));

    // Moving to the free table works
    let patch = ReservationUpdate {
        time_slot: Some(TimeSlot::new("20:30", "21:30")),
        tables: Some(vec![env.tables[1].to_string()]),
        ..Default::default()
    };
    env.manager.update(&id, patch, &env.admin).await.unwrap();
}

#[tokio::test]
async fn terminal_reservations_cannot_be_updated() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    env.manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Cancelled,
                reason: None,
            },
            &env.admin,
        )
        .await
        .unwrap();

    let patch = ReservationUpdate {
        guests: Some(4),
        ..Default::default()
    };
    let err = env.manager.update(&id, patch, &env.admin).await.unwrap_err();
    assert!(matches!(err, ReservationError::Rule(_)));
}

#[tokio::test]
async fn update_cannot_strip_tables_from_table_booking() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    let patch = ReservationUpdate {
        tables: Some(vec![]),
        ..Default::default()
    };
    let err = env.manager.update(&id, patch, &env.admin).await.unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));
}

// ========================================================================
// Notifications
// ========================================================================

#[tokio::test]
async fn lifecycle_dispatches_expected_notifications() {
    let env = test_env().await;
    let reservation = env
        .manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();
    let id = reservation.id.unwrap().to_string();

    let all = notifications(&env.db).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, NotificationType::ReservationNew);
    assert!(all[0].recipient.is_none());
    assert_eq!(all[0].location, Some(env.location.clone()));

    env.manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Confirmed,
                reason: None,
            },
            &env.admin,
        )
        .await
        .unwrap();
    env.manager
        .update_status(
            &id,
            StatusUpdateRequest {
                status: ReservationStatus::Completed,
                reason: None,
            },
            &env.admin,
        )
        .await
        .unwrap();

    // confirmed notifies, completed stays silent
    let all = notifications(&env.db).await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].kind, NotificationType::ReservationConfirmed);
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let env = test_env().await;
    env.manager
        .create(table_booking(&env, &env.tables[..1], "18:00", "20:00"), None)
        .await
        .unwrap();

    let admin: Admin = AdminRepository::new(env.db.clone())
        .find_by_id(&env.admin.to_string())
        .await
        .unwrap()
        .unwrap();
    let repo = NotificationRepository::new(env.db.clone());
    let unread_before = repo.count_unread(&admin).await.unwrap();
    assert_eq!(unread_before, 1);

    let id = notifications(&env.db).await[0].id.clone().unwrap().to_string();
    let first = repo.mark_read(&id, &admin).await.unwrap();
    assert!(first.is_read);
    let first_read_at = first.read_at.unwrap();

    // Second mark succeeds and keeps the original read_at
    let second = repo.mark_read(&id, &admin).await.unwrap();
    assert!(second.is_read);
    assert_eq!(second.read_at, Some(first_read_at));

    assert_eq!(repo.count_unread(&admin).await.unwrap(), 0);
}
