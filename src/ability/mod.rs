pub mod rules;
pub mod scope;

pub use rules::{Action, Resource, Role};
pub use scope::Scope;

use rules::{Effect, Matcher, ResourceKind, Rule};

use crate::entities::user;

/// Per-subject capability evaluator.
///
/// Built fresh for every evaluation from the subject's current row; holds
/// no state shared across subjects or requests. Rules are kept in
/// registration order and scanned back-to-front, so the most recently
/// registered matching rule decides and an explicit deny beats an earlier
/// broad grant. No matching rule means deny.
#[derive(Debug)]
pub struct Ability {
    role: Option<Role>,
    rules: Vec<Rule>,
}

impl Ability {
    /// Build the rule list for a subject, or an empty one for anonymous
    /// callers. No public permissions exist: every capability requires an
    /// identified subject with a role.
    pub fn new(user: Option<&user::Model>) -> Self {
        let mut ability = Self {
            role: user.and_then(|u| u.role()),
            rules: Vec::new(),
        };
        if let Some(user) = user {
            match ability.role {
                Some(Role::Admin) => ability.apply_admin_rules(),
                Some(Role::Scheduler) => ability.apply_scheduler_rules(&user.id),
                Some(Role::Employee) => ability.apply_employee_rules(&user.id),
                None => {}
            }
        }
        ability
    }

    fn apply_admin_rules(&mut self) {
        self.grant(Action::Manage, ResourceKind::All, Matcher::Any);
    }

    fn apply_scheduler_rules(&mut self, subject_id: &str) {
        self.grant(Action::Manage, ResourceKind::User, Matcher::Any);
        // a scheduler administers every user but itself
        self.deny(
            Action::Manage,
            ResourceKind::User,
            Matcher::UserIs(subject_id.to_string()),
        );
        self.grant(Action::Manage, ResourceKind::Shift, Matcher::Any);
        // a scheduler may hand out any role except admin
        self.grant(
            Action::Manage,
            ResourceKind::Role,
            Matcher::RoleIn(vec![Role::Scheduler, Role::Employee]),
        );
    }

    fn apply_employee_rules(&mut self, subject_id: &str) {
        self.grant(
            Action::Read,
            ResourceKind::User,
            Matcher::UserIs(subject_id.to_string()),
        );
        self.grant(
            Action::Read,
            ResourceKind::Shift,
            Matcher::ShiftOwnedBy(subject_id.to_string()),
        );
        // update is deliberately narrower than manage: it backs the
        // acknowledge flow while the edit form stays gated off
        self.grant(
            Action::Update,
            ResourceKind::Shift,
            Matcher::ShiftOwnedBy(subject_id.to_string()),
        );
    }

    fn grant(&mut self, action: Action, kind: ResourceKind, matcher: Matcher) {
        self.rules.push(Rule {
            effect: Effect::Grant,
            action,
            kind,
            matcher,
        });
    }

    fn deny(&mut self, action: Action, kind: ResourceKind, matcher: Matcher) {
        self.rules.push(Rule {
            effect: Effect::Deny,
            action,
            kind,
            matcher,
        });
    }

    /// Can the subject perform `action` on `resource`?
    pub fn can(&self, action: Action, resource: Resource<'_>) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(action, &resource))
            .map(|rule| rule.effect == Effect::Grant)
            .unwrap_or(false)
    }

    pub fn cannot(&self, action: Action, resource: Resource<'_>) -> bool {
        !self.can(action, resource)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_employee(&self) -> bool {
        self.role == Some(Role::Employee)
    }

    pub(crate) fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
