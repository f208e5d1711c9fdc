//! `SQLite` implementation of [`AttendanceRepository`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymdesk_app::ports::AttendanceRepository;
use gymdesk_domain::attendance::Attendance;
use gymdesk_domain::error::{GymError, RuleViolation};
use gymdesk_domain::id::StaffMemberId;

use crate::codec::{parse, parse_date, parse_timestamp};
use crate::error::{StorageError, unique_violation_as};

struct Wrapper(Attendance);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let staff_member_id: String = row.try_get("staff_member_id")?;
        let date: String = row.try_get("date")?;
        let timestamp: String = row.try_get("timestamp")?;

        Ok(Self(Attendance {
            id: parse(&id)?,
            staff_member_id: parse(&staff_member_id)?,
            date: parse_date(&date)?,
            timestamp: parse_timestamp(&timestamp)?,
            image_ref: row.try_get("image_ref")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO attendance (id, staff_member_id, date, timestamp, image_ref) VALUES (?, ?, ?, ?, ?)";
const EXISTS_FOR_DATE: &str =
    "SELECT EXISTS (SELECT 1 FROM attendance WHERE staff_member_id = ? AND date = ?)";
const SELECT_BY_STAFF: &str =
    "SELECT * FROM attendance WHERE staff_member_id = ? ORDER BY timestamp DESC";

/// `SQLite`-backed attendance repository.
#[derive(Clone)]
pub struct SqliteAttendanceRepository {
    pool: SqlitePool,
}

impl SqliteAttendanceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AttendanceRepository for SqliteAttendanceRepository {
    fn create(
        &self,
        attendance: Attendance,
    ) -> impl Future<Output = Result<Attendance, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(attendance.id.to_string())
                .bind(attendance.staff_member_id.to_string())
                .bind(attendance.date.to_string())
                .bind(attendance.timestamp.to_rfc3339())
                .bind(&attendance.image_ref)
                .execute(&pool)
                .await
                .map_err(unique_violation_as(RuleViolation::AttendanceAlreadyMarked))?;

            Ok(attendance)
        }
    }

    fn exists_for_date(
        &self,
        staff_member_id: StaffMemberId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<bool, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let exists: bool = sqlx::query_scalar(EXISTS_FOR_DATE)
                .bind(staff_member_id.to_string())
                .bind(date.to_string())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Attendance>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STAFF)
                .bind(staff_member_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
