mod helpers;

use helpers::{ShiftBuilder, TestDb, UserBuilder};
use shiftboard::ability::{Ability, Action, Resource, Role};
use shiftboard::errors::ScheduleError;
use shiftboard::overlap::{OVERLAP_FIELD, OVERLAP_MESSAGE};
use shiftboard::shifts::{ShiftChanges, NOTICE_ACKNOWLEDGED, NOTICE_UPDATED};
use shiftboard::storage;

const HOUR: i64 = 3600;

fn at_hour(hour: i64) -> i64 {
    1_755_000_000 + hour * HOUR
}

/// A full scheduling week: the scheduler plans shifts for two employees,
/// one employee acknowledges, the scheduler reschedules around a
/// conflict, and every actor sees exactly its own slice of the data.
#[tokio::test]
async fn test_scheduling_round_trip() {
    let test_db = TestDb::new().await;
    let db = test_db.connection();

    let scheduler = UserBuilder::new("sched")
        .with_role(Role::Scheduler)
        .create(db)
        .await;
    let alice = UserBuilder::new("alice")
        .with_role(Role::Employee)
        .create(db)
        .await;
    let bob = UserBuilder::new("bob")
        .with_role(Role::Employee)
        .create(db)
        .await;

    let scheduler_ability = Ability::new(Some(&scheduler));

    let alice_shift = ShiftBuilder::new(&alice)
        .between(at_hour(9), at_hour(17))
        .with_notes("front desk")
        .create(db, &scheduler_ability)
        .await;
    ShiftBuilder::new(&bob)
        .between(at_hour(9), at_hour(17))
        .create(db, &scheduler_ability)
        .await;

    // alice acknowledges; the rest of her submitted edit is dropped
    let alice_ability = Ability::new(Some(&alice));
    let result = storage::update_shift(
        db,
        &alice_ability,
        alice_shift.id,
        ShiftChanges {
            start_time: Some(at_hour(1)),
            acknowledged: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("employee may acknowledge its own shift");
    assert_eq!(result.notice, NOTICE_ACKNOWLEDGED);
    assert_eq!(result.shift.acknowledged, 1);
    assert_eq!(result.shift.start_time, at_hour(9));

    // a second shift colliding with alice's window is rejected
    let err = storage::create_shift(
        db,
        &scheduler_ability,
        storage::NewShift {
            user_id: alice.id.clone(),
            start_time: at_hour(16),
            end_time: at_hour(20),
            notes: None,
        },
    )
    .await
    .expect_err("overlapping shift must be rejected");
    let field_error = err.field_error().expect("expected a validation error");
    assert_eq!(field_error.field, OVERLAP_FIELD);
    assert_eq!(field_error.message, OVERLAP_MESSAGE);

    // rescheduling to the abutting evening window works
    let result = storage::update_shift(
        db,
        &scheduler_ability,
        alice_shift.id,
        ShiftChanges {
            start_time: Some(at_hour(17)),
            end_time: Some(at_hour(21)),
            ..Default::default()
        },
    )
    .await
    .expect("scheduler may reschedule");
    assert_eq!(result.notice, NOTICE_UPDATED);
    assert_eq!(result.shift.start_time, at_hour(17));

    // each employee sees only its own shift, the scheduler sees both
    let visible = storage::accessible_shifts(db, &alice_ability)
        .await
        .expect("Failed to list shifts");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, alice_shift.id);

    let bob_ability = Ability::new(Some(&bob));
    let visible = storage::accessible_shifts(db, &bob_ability)
        .await
        .expect("Failed to list shifts");
    assert_eq!(visible.len(), 1);
    assert_ne!(visible[0].id, alice_shift.id);

    let visible = storage::accessible_shifts(db, &scheduler_ability)
        .await
        .expect("Failed to list shifts");
    assert_eq!(visible.len(), 2);

    // bob cannot touch alice's shift, and the denial hides its existence
    let err = storage::get_accessible_shift(db, &bob_ability, alice_shift.id)
        .await
        .expect_err("foreign shift must be hidden");
    assert!(matches!(err, ScheduleError::AccessDenied));
}

/// Promotion flow: the admin may hand out any role, the scheduler only
/// scheduler and employee, and the employee badge rule holds throughout.
#[tokio::test]
async fn test_role_lifecycle() {
    let test_db = TestDb::new().await;
    let db = test_db.connection();

    let admin = UserBuilder::new("admin").with_role(Role::Admin).create(db).await;
    let scheduler = UserBuilder::new("sched")
        .with_role(Role::Scheduler)
        .create(db)
        .await;
    let newcomer = UserBuilder::new("newcomer").create(db).await;
    assert!(newcomer.role().is_none());

    // a roleless user holds no capability at all
    let newcomer_ability = Ability::new(Some(&newcomer));
    assert!(newcomer_ability.cannot(Action::Read, Resource::User(&newcomer)));
    assert!(storage::accessible_users(db, &newcomer_ability)
        .await
        .expect("Failed to list users")
        .is_empty());

    // the employee role requires a badge
    let admin_ability = Ability::new(Some(&admin));
    let err = storage::set_user_role(db, &admin_ability, &newcomer.id, Role::Employee)
        .await
        .expect_err("employee role without a badge must be rejected");
    let field_error = err.field_error().expect("expected a validation error");
    assert_eq!(field_error.field, "employee_id");
    assert_eq!(field_error.message, "is required");

    storage::update_user(
        db,
        &admin_ability,
        &newcomer.id,
        storage::UserChanges {
            employee_id: Some("EMP-77".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("admin may edit any user");
    let promoted = storage::set_user_role(db, &admin_ability, &newcomer.id, Role::Employee)
        .await
        .expect("admin may assign any role");
    assert_eq!(promoted.role(), Some(Role::Employee));

    // the scheduler may promote to scheduler but never to admin
    let scheduler_ability = Ability::new(Some(&scheduler));
    storage::set_user_role(db, &scheduler_ability, &promoted.id, Role::Scheduler)
        .await
        .expect("scheduler may assign the scheduler role");
    let err = storage::set_user_role(db, &scheduler_ability, &promoted.id, Role::Admin)
        .await
        .expect_err("scheduler must not assign admin");
    assert!(matches!(err, ScheduleError::AccessDenied));
}

/// Anonymous callers hold no capability and see empty record sets.
#[tokio::test]
async fn test_anonymous_has_no_access() {
    let test_db = TestDb::new().await;
    let db = test_db.connection();

    let scheduler = UserBuilder::new("sched")
        .with_role(Role::Scheduler)
        .create(db)
        .await;
    let alice = UserBuilder::new("alice")
        .with_role(Role::Employee)
        .create(db)
        .await;
    let scheduler_ability = Ability::new(Some(&scheduler));
    let shift = ShiftBuilder::new(&alice)
        .between(at_hour(9), at_hour(17))
        .create(db, &scheduler_ability)
        .await;

    let anonymous = Ability::new(None);
    assert!(storage::accessible_users(db, &anonymous)
        .await
        .expect("Failed to list users")
        .is_empty());
    assert!(storage::accessible_shifts(db, &anonymous)
        .await
        .expect("Failed to list shifts")
        .is_empty());

    let err = storage::get_accessible_shift(db, &anonymous, shift.id)
        .await
        .expect_err("anonymous must be denied");
    assert!(matches!(err, ScheduleError::AccessDenied));

    let err = storage::delete_shift(db, &anonymous, shift.id)
        .await
        .expect_err("anonymous must not destroy");
    assert!(matches!(err, ScheduleError::AccessDenied));
}
