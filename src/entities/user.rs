use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ability::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Opaque credential material; hashing/verification is owned by the auth layer.
    pub password_hash: String,
    pub employee_id: Option<String>,
    pub role: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The subject's role, read fresh from the row at every evaluation.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    pub fn is_employee(&self) -> bool {
        self.role() == Some(Role::Employee)
    }
}
