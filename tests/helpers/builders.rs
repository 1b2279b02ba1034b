use sea_orm::DatabaseConnection;
use shiftboard::ability::{Ability, Role};
use shiftboard::entities;
use shiftboard::storage::{self, NewShift, NewUser};

/// Builder for creating test users
pub struct UserBuilder {
    name: String,
    email: String,
    employee_id: Option<String>,
    role: Option<Role>,
}

impl UserBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            employee_id: None,
            role: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        if role == Role::Employee && self.employee_id.is_none() {
            self.employee_id = Some(format!("EMP-{}", self.name));
        }
        self.role = Some(role);
        self
    }

    pub fn with_employee_id(mut self, employee_id: &str) -> Self {
        self.employee_id = Some(employee_id.to_string());
        self
    }

    pub async fn create(self, db: &DatabaseConnection) -> entities::user::Model {
        storage::create_user(
            db,
            NewUser {
                name: self.name,
                email: self.email,
                password_hash: "!".to_string(),
                employee_id: self.employee_id,
                role: self.role,
            },
        )
        .await
        .expect("Failed to create test user")
    }
}

/// Builder for creating test shifts
pub struct ShiftBuilder {
    user_id: String,
    start_time: i64,
    end_time: i64,
    notes: Option<String>,
}

impl ShiftBuilder {
    pub fn new(owner: &entities::user::Model) -> Self {
        Self {
            user_id: owner.id.clone(),
            start_time: 0,
            end_time: 3600,
            notes: None,
        }
    }

    pub fn between(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Create the shift on behalf of the given actor
    pub async fn create(
        self,
        db: &DatabaseConnection,
        actor: &Ability,
    ) -> entities::shift::Model {
        storage::create_shift(
            db,
            actor,
            NewShift {
                user_id: self.user_id,
                start_time: self.start_time,
                end_time: self.end_time,
                notes: self.notes,
            },
        )
        .await
        .expect("Failed to create test shift")
        .shift
    }
}
