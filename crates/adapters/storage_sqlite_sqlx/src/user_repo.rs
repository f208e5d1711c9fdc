//! `SQLite` implementation of [`UserRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymdesk_app::ports::UserRepository;
use gymdesk_domain::error::{ConflictError, GymError};
use gymdesk_domain::id::UserId;
use gymdesk_domain::user::User;

use crate::codec::{parse, parse_date, parse_timestamp};
use crate::error::{StorageError, unique_violation_as};

/// Wrapper for converting database rows into domain [`User`].
///
/// Reads the `users` columns by name, so joined queries can reuse it.
pub(crate) struct UserRow(pub(crate) User);

impl UserRow {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for UserRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let date_of_birth: Option<String> = row.try_get("date_of_birth")?;
        let role: String = row.try_get("role")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(User {
            id: parse(&id)?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            date_of_birth: date_of_birth.as_deref().map(parse_date).transpose()?,
            address_line: row.try_get("address_line")?,
            zip_code: row.try_get("zip_code")?,
            weight: row.try_get("weight")?,
            height: row.try_get("height")?,
            role: parse(&role)?,
            is_partner: row.try_get("is_partner")?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

pub(crate) const INSERT: &str = "INSERT INTO users (id, first_name, last_name, email, phone_number, date_of_birth, address_line, zip_code, weight, height, role, is_partner, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_BY_PHONE: &str = "SELECT * FROM users WHERE phone_number = ? LIMIT 1";
const UPDATE: &str = "UPDATE users SET first_name = ?, last_name = ?, phone_number = ?, date_of_birth = ?, address_line = ?, zip_code = ?, weight = ?, height = ?, role = ?, is_partner = ? WHERE id = ?";

/// Bind every column of [`INSERT`] in order.
pub(crate) fn bind_insert<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    user: &'q User,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(user.date_of_birth.map(|d| d.to_string()))
        .bind(&user.address_line)
        .bind(&user.zip_code)
        .bind(user.weight)
        .bind(user.height)
        .bind(user.role.as_str())
        .bind(user.is_partner)
        .bind(user.created_at.to_rfc3339())
}

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            bind_insert(sqlx::query(INSERT), &user)
                .execute(&pool)
                .await
                .map_err(unique_violation_as(ConflictError::EmailAlreadyExists))?;

            Ok(user)
        }
    }

    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<UserRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(UserRow::maybe(row))
        }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let row: Option<UserRow> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(UserRow::maybe(row))
        }
    }

    fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let pool = self.pool.clone();
        let phone_number = phone_number.to_string();
        async move {
            let row: Option<UserRow> = sqlx::query_as(SELECT_BY_PHONE)
                .bind(phone_number)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(UserRow::maybe(row))
        }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.phone_number)
                .bind(user.date_of_birth.map(|d| d.to_string()))
                .bind(&user.address_line)
                .bind(&user.zip_code)
                .bind(user.weight)
                .bind(user.height)
                .bind(user.role.as_str())
                .bind(user.is_partner)
                .bind(user.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(GymError::not_found("User", user.id));
            }
            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::NaiveDate;
    use gymdesk_domain::user::Role;

    async fn setup() -> SqliteUserRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteUserRepository::new(db.pool().clone())
    }

    fn user(email: &str) -> User {
        User::builder()
            .first_name("Asha")
            .last_name("Rao")
            .email(email)
            .phone_number("9876543210")
            .role(Role::Manager)
            .partner(true)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_get_user() {
        let repo = setup().await;
        let mut asha = user("asha@gym.test");
        asha.date_of_birth = NaiveDate::from_ymd_opt(1990, 4, 12);
        asha.weight = Some(61.5);
        let id = asha.id;

        repo.create(asha.clone()).await.unwrap();
        let fetched = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(fetched.first_name, "Asha");
        assert_eq!(fetched.last_name.as_deref(), Some("Rao"));
        assert_eq!(fetched.role, Role::Manager);
        assert!(fetched.is_partner);
        assert_eq!(fetched.date_of_birth, asha.date_of_birth);
        assert_eq!(fetched.weight, Some(61.5));
        assert_eq!(fetched.created_at.timestamp(), asha.created_at.timestamp());
    }

    #[tokio::test]
    async fn should_return_none_when_user_missing() {
        let repo = setup().await;
        assert!(repo.get_by_id(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_report_duplicate_email_as_conflict() {
        let repo = setup().await;
        repo.create(user("asha@gym.test")).await.unwrap();

        let result = repo.create(user("asha@gym.test")).await;
        assert!(matches!(
            result,
            Err(GymError::Conflict(ConflictError::EmailAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn should_find_by_email_and_phone() {
        let repo = setup().await;
        let asha = user("asha@gym.test");
        repo.create(asha.clone()).await.unwrap();

        let by_email = repo.find_by_email("asha@gym.test").await.unwrap().unwrap();
        assert_eq!(by_email.id, asha.id);

        let by_phone = repo.find_by_phone("9876543210").await.unwrap().unwrap();
        assert_eq!(by_phone.id, asha.id);

        assert!(repo.find_by_phone("0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_update_user() {
        let repo = setup().await;
        let mut asha = user("asha@gym.test");
        repo.create(asha.clone()).await.unwrap();

        asha.address_line = Some("4 Lake View".to_string());
        asha.height = Some(168.0);
        repo.update(asha.clone()).await.unwrap();

        let fetched = repo.get_by_id(asha.id).await.unwrap().unwrap();
        assert_eq!(fetched.address_line.as_deref(), Some("4 Lake View"));
        assert_eq!(fetched.height, Some(168.0));
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_user() {
        let repo = setup().await;
        let result = repo.update(user("ghost@gym.test")).await;
        assert!(matches!(result, Err(GymError::NotFound(_))));
    }
}
