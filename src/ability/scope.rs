use sea_orm::{ColumnTrait, Condition};

use crate::ability::rules::{Action, Effect, Matcher, ResourceKind};
use crate::ability::Ability;
use crate::entities::{shift, user};

/// A record-set filter derived from the subject's read rules.
///
/// The storage layer applies it to the table query, so the restriction
/// runs in SQL instead of filtering rows in memory.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Every row of the type.
    All,
    /// No rows; the query is not even issued.
    Empty,
    /// Rows matching the condition.
    Cond(Condition),
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Empty)
    }
}

/// Rows of `users` the subject may read.
pub fn users(ability: &Ability) -> Scope {
    fold(ability, ResourceKind::User, |matcher| match matcher {
        Matcher::UserIs(id) => Some(Condition::all().add(user::Column::Id.eq(id.clone()))),
        _ => None,
    })
}

/// Rows of `shifts` the subject may read.
pub fn shifts(ability: &Ability) -> Scope {
    fold(ability, ResourceKind::Shift, |matcher| match matcher {
        Matcher::ShiftOwnedBy(id) => {
            Some(Condition::all().add(shift::Column::UserId.eq(id.clone())))
        }
        _ => None,
    })
}

/// Fold the read rules for one resource type into a scope, in
/// registration order: grants widen the set, denies carve out of it.
fn fold<F>(ability: &Ability, kind: ResourceKind, to_cond: F) -> Scope
where
    F: Fn(&Matcher) -> Option<Condition>,
{
    let mut scope = Scope::Empty;
    for rule in ability.rules() {
        if !Action::Read.covered_by(rule.action) {
            continue;
        }
        if rule.kind != ResourceKind::All && rule.kind != kind {
            continue;
        }
        scope = match (&rule.matcher, rule.effect) {
            (Matcher::Any, Effect::Grant) => Scope::All,
            (Matcher::Any, Effect::Deny) => Scope::Empty,
            (matcher, effect) => {
                let Some(cond) = to_cond(matcher) else {
                    continue;
                };
                match (scope, effect) {
                    (Scope::All, Effect::Grant) => Scope::All,
                    (Scope::Empty, Effect::Grant) => Scope::Cond(cond),
                    (Scope::Cond(prev), Effect::Grant) => {
                        Scope::Cond(Condition::any().add(prev).add(cond))
                    }
                    (Scope::All, Effect::Deny) => Scope::Cond(Condition::all().add(cond.not())),
                    (Scope::Empty, Effect::Deny) => Scope::Empty,
                    (Scope::Cond(prev), Effect::Deny) => {
                        Scope::Cond(Condition::all().add(prev).add(cond.not()))
                    }
                }
            }
        };
    }
    scope
}
