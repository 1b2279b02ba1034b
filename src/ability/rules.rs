use serde::{Deserialize, Serialize};

use crate::entities::{shift, user};

/// The three assignable roles. A user row carries at most one; the data
/// layer upholds mutual exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Scheduler,
    Employee,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "scheduler" => Some(Role::Scheduler),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Scheduler => "scheduler",
            Role::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete capability. `Manage` covers every other action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Manage,
    Read,
    Create,
    Update,
    Destroy,
}

impl Action {
    /// Whether a rule granting `granted` applies to a query for `self`.
    pub(crate) fn covered_by(self, granted: Action) -> bool {
        granted == Action::Manage || granted == self
    }
}

/// What a permission query is asked about: a bare resource type or a
/// concrete instance.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// Every resource type at once; only admin rules cover this.
    All,
    Users,
    Shifts,
    User(&'a user::Model),
    Shift(&'a shift::Model),
    Role(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceKind {
    All,
    User,
    Shift,
    Role,
}

impl Resource<'_> {
    pub(crate) fn kind(&self) -> ResourceKind {
        match self {
            Resource::All => ResourceKind::All,
            Resource::Users | Resource::User(_) => ResourceKind::User,
            Resource::Shifts | Resource::Shift(_) => ResourceKind::Shift,
            Resource::Role(_) => ResourceKind::Role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    Grant,
    Deny,
}

/// Scopes a rule beyond "any instance of the type".
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Matcher {
    Any,
    /// user.id = subject id
    UserIs(String),
    /// shift.user_id = subject id
    ShiftOwnedBy(String),
    /// role name within the listed set
    RoleIn(Vec<Role>),
}

/// One entry in the ordered rule list. Insertion order is load-bearing:
/// later rules override earlier ones for overlapping matches.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub effect: Effect,
    pub action: Action,
    pub kind: ResourceKind,
    pub matcher: Matcher,
}

impl Rule {
    /// Whether this rule applies to the query. A scoped rule matches a
    /// bare-type query only when it grants: a scoped deny vetoes
    /// matching instances, never the whole type.
    pub fn matches(&self, action: Action, resource: &Resource<'_>) -> bool {
        if !action.covered_by(self.action) {
            return false;
        }
        if self.kind != ResourceKind::All && self.kind != resource.kind() {
            return false;
        }
        match (&self.matcher, resource) {
            (Matcher::Any, _) => true,
            (Matcher::UserIs(id), Resource::User(u)) => u.id == *id,
            (Matcher::ShiftOwnedBy(id), Resource::Shift(s)) => s.user_id == *id,
            (Matcher::RoleIn(set), Resource::Role(r)) => set.contains(r),
            _ => self.effect == Effect::Grant,
        }
    }
}
