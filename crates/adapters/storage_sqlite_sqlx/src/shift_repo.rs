//! `SQLite` implementation of [`ShiftRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use gymdesk_app::ports::ShiftRepository;
use gymdesk_domain::day::Day;
use gymdesk_domain::error::{ConflictError, GymError};
use gymdesk_domain::id::{ShiftId, StaffMemberId};
use gymdesk_domain::shift::Shift;

use crate::codec::{format_time, parse, parse_time};
use crate::error::{StorageError, unique_violation_as};

struct Wrapper(Shift);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Shift> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let staff_member_id: String = row.try_get("staff_member_id")?;
        let day: String = row.try_get("day")?;
        let start: String = row.try_get("start_time")?;
        let end: String = row.try_get("end_time")?;

        Ok(Self(Shift {
            id: parse(&id)?,
            staff_member_id: parse(&staff_member_id)?,
            day: parse(&day)?,
            start: parse_time(&start)?,
            end: parse_time(&end)?,
        }))
    }
}

pub(crate) const UPDATE_HOURS: &str = "UPDATE shifts SET start_time = ?, end_time = ? WHERE id = ?";

const INSERT: &str =
    "INSERT INTO shifts (id, staff_member_id, day, start_time, end_time) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM shifts WHERE id = ?";
const SELECT_BY_STAFF_AND_DAY: &str = "SELECT * FROM shifts WHERE staff_member_id = ? AND day = ?";
const SELECT_BY_STAFF: &str = "SELECT * FROM shifts WHERE staff_member_id = ?";

/// Read one shift through an existing connection or transaction.
pub(crate) async fn select_shift(
    conn: &mut SqliteConnection,
    id: ShiftId,
) -> Result<Option<Shift>, sqlx::Error> {
    let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;
    Ok(Wrapper::maybe(row))
}

/// `SQLite`-backed shift repository.
#[derive(Clone)]
pub struct SqliteShiftRepository {
    pool: SqlitePool,
}

impl SqliteShiftRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ShiftRepository for SqliteShiftRepository {
    fn create(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(shift.id.to_string())
                .bind(shift.staff_member_id.to_string())
                .bind(shift.day.as_str())
                .bind(format_time(shift.start))
                .bind(format_time(shift.end))
                .execute(&pool)
                .await
                .map_err(unique_violation_as(ConflictError::Duplicate("shift")))?;

            Ok(shift)
        }
    }

    fn update(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE_HOURS)
                .bind(format_time(shift.start))
                .bind(format_time(shift.end))
                .bind(shift.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(GymError::not_found("Shift", shift.id));
            }
            Ok(shift)
        }
    }

    fn get_by_id(
        &self,
        id: ShiftId,
    ) -> impl Future<Output = Result<Option<Shift>, GymError>> + Send {
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

    fn find_by_staff_and_day(
        &self,
        staff_member_id: StaffMemberId,
        day: Day,
    ) -> impl Future<Output = Result<Option<Shift>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_STAFF_AND_DAY)
                .bind(staff_member_id.to_string())
                .bind(day.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Shift>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STAFF)
                .bind(staff_member_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut shifts: Vec<Shift> = rows.into_iter().map(|w| w.0).collect();
            shifts.sort_by_key(|shift| shift.day);
            Ok(shifts)
        }
    }
}
