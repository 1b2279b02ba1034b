//! Shift mutation policy: which fields an actor may change on update,
//! and the notice reported back to the caller.

use crate::ability::{Ability, Action, Resource};
use crate::entities::shift;

pub const NOTICE_CREATED: &str = "Shift was successfully created.";
pub const NOTICE_UPDATED: &str = "Shift was successfully updated.";
pub const NOTICE_ACKNOWLEDGED: &str = "Shift was successfully acknowledged.";
pub const NOTICE_DELETED: &str = "Shift was successfully deleted.";

/// Requested changes to a shift. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ShiftChanges {
    pub user_id: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub notes: Option<String>,
    pub acknowledged: Option<bool>,
}

impl ShiftChanges {
    /// The one change an employee is entitled to make.
    pub fn acknowledge() -> Self {
        Self {
            acknowledged: Some(true),
            ..Default::default()
        }
    }
}

/// Restrict the accepted field set per the actor's role, evaluated fresh
/// on every request.
///
/// An employee may invoke update on its own shift, but only to set the
/// acknowledged flag; any other submitted field is silently dropped (not
/// a permission violation) and the notice changes accordingly. Everyone
/// else gets the full field set.
pub fn permitted_changes(
    ability: &Ability,
    shift: &shift::Model,
    requested: ShiftChanges,
) -> (ShiftChanges, &'static str) {
    if ability.can(Action::Update, Resource::Shift(shift)) && ability.is_employee() {
        (
            ShiftChanges {
                acknowledged: requested.acknowledged,
                ..Default::default()
            },
            NOTICE_ACKNOWLEDGED,
        )
    } else {
        (requested, NOTICE_UPDATED)
    }
}

/// Gate for presenting the edit affordance. Employees hold the update
/// capability for the acknowledge flow but must never see the generic
/// edit form, so this requires update plus a non-employee role.
pub fn can_edit(ability: &Ability, shift: &shift::Model) -> bool {
    ability.can(Action::Update, Resource::Shift(shift)) && !ability.is_employee()
}
