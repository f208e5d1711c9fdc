//! `SQLite` implementation of [`InterchangeRepository`].
//!
//! Status changes are conditional on the stored row still being `pending`.
//! Approval claims the row, re-reads both shifts and swaps them inside the
//! same transaction.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use gymdesk_app::ports::InterchangeRepository;
use gymdesk_domain::error::{ConflictError, GymError, RuleViolation};
use gymdesk_domain::id::{InterchangeRequestId, ShiftId, StaffMemberId};
use gymdesk_domain::interchange::ShiftInterchangeRequest;
use gymdesk_domain::shift::Shift;

use crate::codec::{format_time, parse, parse_timestamp};
use crate::error::{StorageError, unique_violation_as};
use crate::shift_repo::{UPDATE_HOURS, select_shift};

struct Wrapper(ShiftInterchangeRequest);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ShiftInterchangeRequest> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let requester_id: String = row.try_get("requester_id")?;
        let target_id: String = row.try_get("target_id")?;
        let requester_shift_id: String = row.try_get("requester_shift_id")?;
        let target_shift_id: String = row.try_get("target_shift_id")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(ShiftInterchangeRequest {
            id: parse(&id)?,
            requester_id: parse(&requester_id)?,
            target_id: parse(&target_id)?,
            requester_shift_id: parse(&requester_shift_id)?,
            target_shift_id: parse(&target_shift_id)?,
            status: parse(&status)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO interchange_requests (id, requester_id, target_id, requester_shift_id, target_shift_id, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM interchange_requests WHERE id = ?";
const SELECT_PENDING: &str = "SELECT * FROM interchange_requests WHERE requester_shift_id = ? AND target_shift_id = ? AND status = 'pending'";
const SELECT_FOR_STAFF: &str = "SELECT * FROM interchange_requests WHERE requester_id = ? OR target_id = ? ORDER BY created_at DESC";
const UPDATE_STATUS_IF_PENDING: &str = "UPDATE interchange_requests SET status = ?, updated_at = ? WHERE id = ? AND status = 'pending'";
const CLAIM_FOR_APPROVAL: &str = "UPDATE interchange_requests SET status = 'approved' WHERE id = ? AND status = 'pending'";
const STAMP_UPDATED_AT: &str = "UPDATE interchange_requests SET updated_at = ? WHERE id = ?";

/// `SQLite`-backed interchange request repository.
#[derive(Clone)]
pub struct SqliteInterchangeRepository {
    pool: SqlitePool,
}

impl SqliteInterchangeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl InterchangeRepository for SqliteInterchangeRepository {
    fn create(
        &self,
        request: ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(request.id.to_string())
                .bind(request.requester_id.to_string())
                .bind(request.target_id.to_string())
                .bind(request.requester_shift_id.to_string())
                .bind(request.target_shift_id.to_string())
                .bind(request.status.as_str())
                .bind(request.created_at.to_rfc3339())
                .bind(request.updated_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(unique_violation_as(ConflictError::InterchangeAlreadyPending))?;

            Ok(request)
        }
    }

    fn get_by_id(
        &self,
        id: InterchangeRequestId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_pending(
        &self,
        requester_shift_id: ShiftId,
        target_shift_id: ShiftId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_PENDING)
                .bind(requester_shift_id.to_string())
                .bind(target_shift_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_for_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<ShiftInterchangeRequest>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let id = staff_member_id.to_string();
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_FOR_STAFF)
                .bind(&id)
                .bind(&id)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn record_rejection(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<(), GymError>> + Send {
        let pool = self.pool.clone();
        let id = request.id.to_string();
        let status = request.status.as_str();
        let updated_at = request.updated_at.to_rfc3339();
        async move {
            let result = sqlx::query(UPDATE_STATUS_IF_PENDING)
                .bind(status)
                .bind(updated_at)
                .bind(id)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(RuleViolation::InterchangeNotPending.into());
            }
            Ok(())
        }
    }

    fn approve_with_swap(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send {
        let pool = self.pool.clone();
        let request = request.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            match swap_in(&mut tx, request).await {
                Ok(approved) => {
                    tx.commit().await.map_err(StorageError::from)?;
                    Ok(approved)
                }
                Err(err) => {
                    tx.rollback().await.map_err(StorageError::from)?;
                    Err(err)
                }
            }
        }
    }
}

/// Claim, re-read, swap and stamp inside `tx`.
///
/// The claim is the first statement, so it holds the write lock before the
/// shifts are read.
async fn swap_in(
    tx: &mut Transaction<'_, Sqlite>,
    mut request: ShiftInterchangeRequest,
) -> Result<ShiftInterchangeRequest, GymError> {
    let id = request.id.to_string();
    let claimed = sqlx::query(CLAIM_FOR_APPROVAL)
        .bind(&id)
        .execute(&mut **tx)
        .await
        .map_err(StorageError::from)?;
    if claimed.rows_affected() == 0 {
        return Err(RuleViolation::InterchangeNotPending.into());
    }

    let mut requester_shift = stored_shift(tx, request.requester_shift_id).await?;
    let mut target_shift = stored_shift(tx, request.target_shift_id).await?;
    request.approve(&mut requester_shift, &mut target_shift)?;

    for shift in [&requester_shift, &target_shift] {
        let result = sqlx::query(UPDATE_HOURS)
            .bind(format_time(shift.start))
            .bind(format_time(shift.end))
            .bind(shift.id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(GymError::not_found("Shift", shift.id));
        }
    }

    sqlx::query(STAMP_UPDATED_AT)
        .bind(request.updated_at.to_rfc3339())
        .bind(&id)
        .execute(&mut **tx)
        .await
        .map_err(StorageError::from)?;

    Ok(request)
}

async fn stored_shift(tx: &mut Transaction<'_, Sqlite>, id: ShiftId) -> Result<Shift, GymError> {
    select_shift(&mut **tx, id)
        .await
        .map_err(StorageError::from)?
        .ok_or_else(|| GymError::not_found("Shift", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift_repo::SqliteShiftRepository;
    use crate::shift_repo::tests::{at, seeded_pool, seeded_pool_at};
    use gymdesk_app::ports::ShiftRepository;
    use gymdesk_domain::day::Day;
    use gymdesk_domain::interchange::{Decision, InterchangeStatus};

    struct Fixture {
        pool: SqlitePool,
        interchanges: SqliteInterchangeRepository,
        shifts: SqliteShiftRepository,
        mine: Shift,
        theirs: Shift,
    }

    async fn setup() -> Fixture {
        let (pool, _, staff) = seeded_pool(&["Ravi", "Sana"]).await;
        let shifts = SqliteShiftRepository::new(pool.clone());
        let mine = Shift::new(staff[0].id, Day::Tuesday, at(6), at(14)).unwrap();
        let theirs = Shift::new(staff[1].id, Day::Tuesday, at(14), at(22)).unwrap();
        shifts.create(mine.clone()).await.unwrap();
        shifts.create(theirs.clone()).await.unwrap();
        Fixture {
            interchanges: SqliteInterchangeRepository::new(pool.clone()),
            pool,
            shifts,
            mine,
            theirs,
        }
    }

    #[tokio::test]
    async fn should_create_and_find_pending_request() {
        let f = setup().await;
        let request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();

        let fetched = f.interchanges.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, InterchangeStatus::Pending);
        assert_eq!(fetched.requester_shift_id, f.mine.id);

        let pending = f
            .interchanges
            .find_pending(f.mine.id, f.theirs.id)
            .await
            .unwrap();
        assert_eq!(pending.map(|r| r.id), Some(request.id));

        let for_target = f
            .interchanges
            .list_for_staff(f.theirs.staff_member_id)
            .await
            .unwrap();
        assert_eq!(for_target.len(), 1);
    }

    #[tokio::test]
    async fn should_refuse_second_pending_request_for_same_shifts() {
        let f = setup().await;
        f.interchanges
            .create(ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap())
            .await
            .unwrap();

        let result = f
            .interchanges
            .create(ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap())
            .await;
        assert!(matches!(
            result,
            Err(GymError::Conflict(ConflictError::InterchangeAlreadyPending))
        ));
    }

    #[tokio::test]
    async fn should_swap_hours_and_status_atomically() {
        let f = setup().await;
        let request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();

        let approved = f.interchanges.approve_with_swap(&request).await.unwrap();
        assert_eq!(approved.status, InterchangeStatus::Approved);

        let stored = f.interchanges.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InterchangeStatus::Approved);
        let mine = f.shifts.get_by_id(f.mine.id).await.unwrap().unwrap();
        let theirs = f.shifts.get_by_id(f.theirs.id).await.unwrap().unwrap();
        assert_eq!((mine.start, mine.end), (at(14), at(22)));
        assert_eq!((theirs.start, theirs.end), (at(6), at(14)));

        assert!(
            f.interchanges
                .find_pending(f.mine.id, f.theirs.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn should_leave_shifts_untouched_when_request_already_decided() {
        let f = setup().await;
        let request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();

        let mut rejected = request.clone();
        rejected.transition(Decision::Rejected).unwrap();
        f.interchanges.record_rejection(&rejected).await.unwrap();

        let result = f.interchanges.approve_with_swap(&request).await;

        assert!(matches!(
            result,
            Err(GymError::Rule(RuleViolation::InterchangeNotPending))
        ));
        let stored = f.interchanges.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InterchangeStatus::Rejected);
        let mine = f.shifts.get_by_id(f.mine.id).await.unwrap().unwrap();
        assert_eq!(mine.start, at(6));
    }

    #[tokio::test]
    async fn should_roll_back_claim_when_shifts_no_longer_swappable() {
        let f = setup().await;
        let request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();
        sqlx::query("UPDATE shifts SET day = 'wednesday' WHERE id = ?")
            .bind(f.theirs.id.to_string())
            .execute(&f.pool)
            .await
            .unwrap();

        let result = f.interchanges.approve_with_swap(&request).await;

        assert!(matches!(
            result,
            Err(GymError::Rule(RuleViolation::InterchangeDayMismatch))
        ));
        let stored = f.interchanges.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InterchangeStatus::Pending);
        let mine = f.shifts.get_by_id(f.mine.id).await.unwrap().unwrap();
        let theirs = f.shifts.get_by_id(f.theirs.id).await.unwrap().unwrap();
        assert_eq!((mine.start, mine.end), (at(6), at(14)));
        assert_eq!((theirs.start, theirs.end), (at(14), at(22)));
    }

    #[tokio::test]
    async fn should_undo_first_shift_write_when_second_touches_no_row() {
        let f = setup().await;
        let request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();
        let trigger = format!(
            "CREATE TRIGGER skip_target BEFORE UPDATE ON shifts WHEN OLD.id = '{}' \
             BEGIN SELECT RAISE(IGNORE); END",
            f.theirs.id
        );
        sqlx::query(&trigger).execute(&f.pool).await.unwrap();

        let result = f.interchanges.approve_with_swap(&request).await;

        assert!(matches!(result, Err(GymError::NotFound(_))));
        let stored = f.interchanges.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InterchangeStatus::Pending);
        let mine = f.shifts.get_by_id(f.mine.id).await.unwrap().unwrap();
        assert_eq!((mine.start, mine.end), (at(6), at(14)));
    }

    #[tokio::test]
    async fn should_exchange_current_hours_when_concurrent_approvals_share_a_shift() {
        let path = std::env::temp_dir().join(format!("gymdesk-swap-{}.db", ShiftId::new()));
        let url = format!("sqlite://{}", path.display());
        let (pool, _, staff) = seeded_pool_at(&url, &["Ravi", "Sana", "Dev"]).await;
        let shifts = SqliteShiftRepository::new(pool.clone());
        let interchanges = SqliteInterchangeRepository::new(pool.clone());

        let shared = Shift::new(staff[0].id, Day::Tuesday, at(6), at(10)).unwrap();
        let second = Shift::new(staff[1].id, Day::Tuesday, at(10), at(14)).unwrap();
        let third = Shift::new(staff[2].id, Day::Tuesday, at(14), at(18)).unwrap();
        for shift in [&shared, &second, &third] {
            shifts.create(shift.clone()).await.unwrap();
        }

        for _ in 0..10 {
            let first = ShiftInterchangeRequest::open(&shared, &second).unwrap();
            let other = ShiftInterchangeRequest::open(&shared, &third).unwrap();
            interchanges.create(first.clone()).await.unwrap();
            interchanges.create(other.clone()).await.unwrap();

            let (a, b) = tokio::join!(
                interchanges.approve_with_swap(&first),
                interchanges.approve_with_swap(&other),
            );
            assert_eq!(a.unwrap().status, InterchangeStatus::Approved);
            assert_eq!(b.unwrap().status, InterchangeStatus::Approved);

            let mut hours = Vec::new();
            for shift in [&shared, &second, &third] {
                let stored = shifts.get_by_id(shift.id).await.unwrap().unwrap();
                hours.push((stored.start, stored.end));
            }
            hours.sort();
            assert_eq!(
                hours,
                vec![(at(6), at(10)), (at(10), at(14)), (at(14), at(18))]
            );
        }

        pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[tokio::test]
    async fn should_refuse_rejecting_twice() {
        let f = setup().await;
        let mut request = ShiftInterchangeRequest::open(&f.mine, &f.theirs).unwrap();
        f.interchanges.create(request.clone()).await.unwrap();
        request.transition(Decision::Rejected).unwrap();
        f.interchanges.record_rejection(&request).await.unwrap();

        let result = f.interchanges.record_rejection(&request).await;
        assert!(matches!(
            result,
            Err(GymError::Rule(RuleViolation::InterchangeNotPending))
        ));
    }
}
