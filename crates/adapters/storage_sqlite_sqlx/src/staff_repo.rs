//! `SQLite` implementation of [`StaffRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymdesk_app::ports::StaffRepository;
use gymdesk_domain::day::Day;
use gymdesk_domain::error::{ConflictError, GymError};
use gymdesk_domain::id::{StaffMemberId, UserId};
use gymdesk_domain::staff::{StaffMember, StaffMemberProfile};
use gymdesk_domain::user::User;

use crate::codec::{parse, parse_json};
use crate::error::{StorageError, unique_violation_as};
use crate::user_repo::{self, UserRow};

struct Wrapper(StaffMember);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<StaffMember> {
        value.map(|w| w.0)
    }
}

/// Reads the staff columns; joined queries alias the record id as `staff_id`.
fn staff_from_row(row: &SqliteRow, id_column: &str) -> Result<StaffMember, sqlx::Error> {
    let id: String = row.try_get(id_column)?;
    let user_id: String = row.try_get("user_id")?;
    let manager_id: String = row.try_get("manager_id")?;
    let weekly_off: String = row.try_get("weekly_off")?;
    let weekly_off: Vec<Day> = parse_json(&weekly_off)?;

    Ok(StaffMember {
        id: parse(&id)?,
        user_id: parse(&user_id)?,
        manager_id: parse(&manager_id)?,
        employee_id: row.try_get("employee_id")?,
        weekly_off,
    })
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        staff_from_row(row, "id").map(Self)
    }
}

struct ProfileWrapper(StaffMemberProfile);

impl<'r> FromRow<'r, SqliteRow> for ProfileWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let staff = staff_from_row(row, "staff_id")?;
        let UserRow(user) = UserRow::from_row(row)?;
        Ok(Self(StaffMemberProfile { staff, user }))
    }
}

const INSERT: &str = "INSERT INTO staff_members (id, user_id, manager_id, employee_id, weekly_off) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM staff_members WHERE id = ?";
const SELECT_BY_EMPLOYEE_ID: &str = "SELECT * FROM staff_members WHERE employee_id = ?";
const SELECT_BY_USER_ID: &str = "SELECT * FROM staff_members WHERE user_id = ?";
const SELECT_PROFILES_BY_MANAGER: &str = "SELECT s.id AS staff_id, s.user_id, s.manager_id, s.employee_id, s.weekly_off, u.* FROM staff_members s JOIN users u ON u.id = s.user_id WHERE s.manager_id = ? ORDER BY u.first_name, s.employee_id";
const UPDATE_WEEKLY_OFF: &str = "UPDATE staff_members SET weekly_off = ? WHERE id = ?";

/// `SQLite`-backed staff repository.
#[derive(Clone)]
pub struct SqliteStaffRepository {
    pool: SqlitePool,
}

impl SqliteStaffRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StaffRepository for SqliteStaffRepository {
    fn enroll(
        &self,
        user: User,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMemberProfile, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let weekly_off = serde_json::to_string(&staff.weekly_off).map_err(StorageError::from)?;
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            user_repo::bind_insert(sqlx::query(user_repo::INSERT), &user)
                .execute(&mut *tx)
                .await
                .map_err(unique_violation_as(ConflictError::EmailAlreadyExists))?;

            sqlx::query(INSERT)
                .bind(staff.id.to_string())
                .bind(staff.user_id.to_string())
                .bind(staff.manager_id.to_string())
                .bind(&staff.employee_id)
                .bind(weekly_off)
                .execute(&mut *tx)
                .await
                .map_err(unique_violation_as(ConflictError::Duplicate("employee id")))?;

            tx.commit().await.map_err(StorageError::from)?;

            Ok(StaffMemberProfile { staff, user })
        }
    }

    fn get_by_id(
        &self,
        id: StaffMemberId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
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

    fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
        let pool = self.pool.clone();
        let employee_id = employee_id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMPLOYEE_ID)
                .bind(employee_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER_ID)
                .bind(user_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn list_by_manager(
        &self,
        manager_id: UserId,
    ) -> impl Future<Output = Result<Vec<StaffMemberProfile>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<ProfileWrapper> = sqlx::query_as(SELECT_PROFILES_BY_MANAGER)
                .bind(manager_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMember, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let weekly_off = serde_json::to_string(&staff.weekly_off).map_err(StorageError::from)?;
            let result = sqlx::query(UPDATE_WEEKLY_OFF)
                .bind(weekly_off)
                .bind(staff.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(GymError::not_found("StaffMember", staff.id));
            }
            Ok(staff)
        }
    }
}
