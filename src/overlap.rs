//! Temporal conflict validation for shift intervals.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::shift;
use crate::errors::{FieldError, ScheduleError};

pub const OVERLAP_FIELD: &str = "dates";
pub const OVERLAP_MESSAGE: &str = "overlap with other shift";

/// Reject `[start_time, end_time)` if it overlaps another shift of the
/// same owner. Two half-open intervals `[a1,a2)` and `[b1,b2)` overlap
/// iff `a1 < b2 && b1 < a2`, so touching endpoints pass. Shifts of other
/// owners are never compared.
///
/// Issues a single query backed by the `(user_id, start_time, end_time)`
/// index. Call it on the transaction that performs the guarded write so
/// the check-then-write sequence is serialized against concurrent
/// writers for the same owner.
pub async fn ensure_no_overlap<C: ConnectionTrait>(
    conn: &C,
    owner_id: &str,
    start_time: i64,
    end_time: i64,
    exclude_id: Option<i32>,
) -> Result<(), ScheduleError> {
    let mut query = shift::Entity::find()
        .filter(shift::Column::UserId.eq(owner_id))
        .filter(shift::Column::StartTime.lt(end_time))
        .filter(shift::Column::EndTime.gt(start_time));

    // when updating, the row being updated must not conflict with itself
    if let Some(id) = exclude_id {
        query = query.filter(shift::Column::Id.ne(id));
    }

    if query.one(conn).await?.is_some() {
        return Err(FieldError::new(OVERLAP_FIELD, OVERLAP_MESSAGE).into());
    }
    Ok(())
}
