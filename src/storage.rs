use base64ct::Encoding;
use chrono::Utc;
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::ability::{scope, Ability, Action, Resource, Role, Scope};
use crate::entities::{shift, user};
use crate::errors::{FieldError, ScheduleError};
use crate::overlap::ensure_no_overlap;
use crate::settings::Database as DbCfg;
use crate::shifts::{self, ShiftChanges};

pub async fn init(cfg: &DbCfg) -> Result<DatabaseConnection, ScheduleError> {
    let db = Database::connect(&cfg.url).await?;
    Ok(db)
}

fn random_id() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64ct::Base64UrlUnpadded::encode_string(&bytes)
}

fn now() -> i64 {
    Utc::now().timestamp()
}

// User management functions

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Opaque; produced by the auth layer, stored verbatim.
    pub password_hash: String,
    pub employee_id: Option<String>,
    pub role: Option<Role>,
}

/// Requested changes to a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
}

fn validate_user(name: &str, role: Option<Role>, employee_id: Option<&str>) -> Result<(), ScheduleError> {
    if name.trim().is_empty() {
        return Err(FieldError::new("name", "can't be blank").into());
    }
    // the employee role requires a non-blank employee identifier,
    // enforced here independent of the permission engine
    if role == Some(Role::Employee) && employee_id.map(str::trim).map_or(true, str::is_empty) {
        return Err(FieldError::new("employee_id", "is required").into());
    }
    Ok(())
}

pub async fn create_user(
    db: &DatabaseConnection,
    input: NewUser,
) -> Result<user::Model, ScheduleError> {
    validate_user(&input.name, input.role, input.employee_id.as_deref())?;

    let user = user::ActiveModel {
        id: Set(random_id()),
        name: Set(input.name),
        email: Set(input.email),
        password_hash: Set(input.password_hash),
        employee_id: Set(input.employee_id),
        role: Set(input.role.map(|r| r.as_str().to_string())),
        created_at: Set(now()),
    };

    Ok(user.insert(db).await?)
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<user::Model>, ScheduleError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, ScheduleError> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn update_user(
    db: &DatabaseConnection,
    ability: &Ability,
    user_id: &str,
    changes: UserChanges,
) -> Result<user::Model, ScheduleError> {
    let Some(user) = user::Entity::find_by_id(user_id).one(db).await? else {
        return Err(ScheduleError::AccessDenied);
    };
    if ability.cannot(Action::Update, Resource::User(&user)) {
        return Err(ScheduleError::AccessDenied);
    }

    let name = changes.name.unwrap_or_else(|| user.name.clone());
    let employee_id = changes.employee_id.or_else(|| user.employee_id.clone());
    validate_user(&name, user.role(), employee_id.as_deref())?;

    let mut active: user::ActiveModel = user.into();
    active.name = Set(name);
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    active.employee_id = Set(employee_id);

    Ok(active.update(db).await?)
}

/// Assign a role, gated on the acting subject's capability for that
/// specific role name: a scheduler may hand out scheduler or employee
/// but never admin.
pub async fn set_user_role(
    db: &DatabaseConnection,
    ability: &Ability,
    user_id: &str,
    role: Role,
) -> Result<user::Model, ScheduleError> {
    if ability.cannot(Action::Manage, Resource::Role(role)) {
        return Err(ScheduleError::AccessDenied);
    }
    let Some(user) = user::Entity::find_by_id(user_id).one(db).await? else {
        return Err(ScheduleError::AccessDenied);
    };
    // the target row is authorized too: a scheduler administers every
    // user but itself, so its own role stays out of reach
    if ability.cannot(Action::Update, Resource::User(&user)) {
        return Err(ScheduleError::AccessDenied);
    }

    validate_user(&user.name, Some(role), user.employee_id.as_deref())?;

    let mut active: user::ActiveModel = user.into();
    active.role = Set(Some(role.as_str().to_string()));
    Ok(active.update(db).await?)
}

pub async fn delete_user(
    db: &DatabaseConnection,
    ability: &Ability,
    user_id: &str,
) -> Result<(), ScheduleError> {
    let Some(user) = user::Entity::find_by_id(user_id).one(db).await? else {
        return Err(ScheduleError::AccessDenied);
    };
    if ability.cannot(Action::Destroy, Resource::User(&user)) {
        return Err(ScheduleError::AccessDenied);
    }

    let txn = db.begin().await?;
    shift::Entity::delete_many()
        .filter(shift::Column::UserId.eq(user.id.clone()))
        .exec(&txn)
        .await?;
    user::Entity::delete_by_id(user.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Exactly the user rows the subject may read, filtered in SQL.
pub async fn accessible_users(
    db: &DatabaseConnection,
    ability: &Ability,
) -> Result<Vec<user::Model>, ScheduleError> {
    match scope::users(ability) {
        Scope::All => Ok(user::Entity::find().all(db).await?),
        Scope::Empty => Ok(Vec::new()),
        Scope::Cond(cond) => Ok(user::Entity::find().filter(cond).all(db).await?),
    }
}

/// A row outside the subject's scope is indistinguishable from a
/// missing one: both come back as `AccessDenied`.
pub async fn get_accessible_user(
    db: &DatabaseConnection,
    ability: &Ability,
    id: &str,
) -> Result<user::Model, ScheduleError> {
    let found = match scope::users(ability) {
        Scope::All => user::Entity::find_by_id(id).one(db).await?,
        Scope::Empty => None,
        Scope::Cond(cond) => user::Entity::find_by_id(id).filter(cond).one(db).await?,
    };
    found.ok_or(ScheduleError::AccessDenied)
}

// Shift management functions

#[derive(Debug, Clone)]
pub struct NewShift {
    pub user_id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub notes: Option<String>,
}

/// A persisted shift plus the notice reported back to the caller.
#[derive(Debug, Clone)]
pub struct SavedShift {
    pub shift: shift::Model,
    pub notice: &'static str,
}

pub async fn create_shift(
    db: &DatabaseConnection,
    ability: &Ability,
    input: NewShift,
) -> Result<SavedShift, ScheduleError> {
    if ability.cannot(Action::Create, Resource::Shifts) {
        return Err(ScheduleError::AccessDenied);
    }

    let txn = db.begin().await?;

    if user::Entity::find_by_id(&input.user_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(FieldError::new("user", "must exist").into());
    }

    ensure_no_overlap(&txn, &input.user_id, input.start_time, input.end_time, None).await?;

    let ts = now();
    let shift = shift::ActiveModel {
        user_id: Set(input.user_id),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        acknowledged: Set(0),
        notes: Set(input.notes),
        created_at: Set(ts),
        updated_at: Set(ts),
        ..Default::default()
    };

    let created = shift.insert(&txn).await?;
    txn.commit().await?;
    Ok(SavedShift {
        shift: created,
        notice: shifts::NOTICE_CREATED,
    })
}

pub async fn update_shift(
    db: &DatabaseConnection,
    ability: &Ability,
    shift_id: i32,
    requested: ShiftChanges,
) -> Result<SavedShift, ScheduleError> {
    let Some(shift) = shift::Entity::find_by_id(shift_id).one(db).await? else {
        return Err(ScheduleError::AccessDenied);
    };
    if ability.cannot(Action::Update, Resource::Shift(&shift)) {
        return Err(ScheduleError::AccessDenied);
    }

    // restrict the accepted fields per role, fresh on every request
    let (permitted, notice) = shifts::permitted_changes(ability, &shift, requested);

    let owner = permitted.user_id.unwrap_or_else(|| shift.user_id.clone());
    let start_time = permitted.start_time.unwrap_or(shift.start_time);
    let end_time = permitted.end_time.unwrap_or(shift.end_time);

    let txn = db.begin().await?;

    if owner != shift.user_id
        && user::Entity::find_by_id(&owner).one(&txn).await?.is_none()
    {
        return Err(FieldError::new("user", "must exist").into());
    }

    // self-excluding, so rewriting the same interval never conflicts
    ensure_no_overlap(&txn, &owner, start_time, end_time, Some(shift.id)).await?;

    let mut active: shift::ActiveModel = shift.into();
    active.user_id = Set(owner);
    active.start_time = Set(start_time);
    active.end_time = Set(end_time);
    if let Some(notes) = permitted.notes {
        active.notes = Set(Some(notes));
    }
    if let Some(acknowledged) = permitted.acknowledged {
        active.acknowledged = Set(if acknowledged { 1 } else { 0 });
    }
    active.updated_at = Set(now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(SavedShift {
        shift: updated,
        notice,
    })
}

pub async fn delete_shift(
    db: &DatabaseConnection,
    ability: &Ability,
    shift_id: i32,
) -> Result<&'static str, ScheduleError> {
    let Some(shift) = shift::Entity::find_by_id(shift_id).one(db).await? else {
        return Err(ScheduleError::AccessDenied);
    };
    if ability.cannot(Action::Destroy, Resource::Shift(&shift)) {
        return Err(ScheduleError::AccessDenied);
    }

    shift::Entity::delete_by_id(shift.id).exec(db).await?;
    Ok(shifts::NOTICE_DELETED)
}

/// Exactly the shift rows the subject may read, filtered in SQL.
pub async fn accessible_shifts(
    db: &DatabaseConnection,
    ability: &Ability,
) -> Result<Vec<shift::Model>, ScheduleError> {
    match scope::shifts(ability) {
        Scope::All => Ok(shift::Entity::find().all(db).await?),
        Scope::Empty => Ok(Vec::new()),
        Scope::Cond(cond) => Ok(shift::Entity::find().filter(cond).all(db).await?),
    }
}

pub async fn get_accessible_shift(
    db: &DatabaseConnection,
    ability: &Ability,
    id: i32,
) -> Result<shift::Model, ScheduleError> {
    let found = match scope::shifts(ability) {
        Scope::All => shift::Entity::find_by_id(id).one(db).await?,
        Scope::Empty => None,
        Scope::Cond(cond) => shift::Entity::find_by_id(id).filter(cond).one(db).await?,
    };
    found.ok_or(ScheduleError::AccessDenied)
}
