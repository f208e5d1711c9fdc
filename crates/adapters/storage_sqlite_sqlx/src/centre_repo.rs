//! `SQLite` implementation of [`FitnessCentreRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymdesk_app::ports::FitnessCentreRepository;
use gymdesk_domain::error::{ConflictError, GymError};
use gymdesk_domain::fitness_centre::FitnessCentre;
use gymdesk_domain::id::{FitnessCentreId, UserId};
use gymdesk_domain::time::now;
use gymdesk_domain::user::User;

use crate::codec::{parse, parse_timestamp};
use crate::error::{StorageError, unique_violation_as};
use crate::user_repo::UserRow;

struct Wrapper(FitnessCentre);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<FitnessCentre> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let owner_id: String = row.try_get("owner_id")?;
        let created_on: String = row.try_get("created_on")?;
        let updated_on: String = row.try_get("updated_on")?;

        Ok(Self(FitnessCentre {
            id: parse(&id)?,
            code: row.try_get("code")?,
            owner_id: parse(&owner_id)?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            phone_number: row.try_get("phone_number")?,
            zip_code: row.try_get("zip_code")?,
            description: row.try_get("description")?,
            created_on: parse_timestamp(&created_on)?,
            updated_on: parse_timestamp(&updated_on)?,
        }))
    }
}

const INSERT: &str = "INSERT INTO fitness_centres (id, code, owner_id, name, address, phone_number, zip_code, description, created_on, updated_on) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_OWNER: &str = "SELECT * FROM fitness_centres WHERE owner_id = ?";
const INSERT_MEMBER: &str =
    "INSERT OR IGNORE INTO centre_members (centre_id, user_id, joined_at) VALUES (?, ?, ?)";
const DELETE_MEMBER: &str = "DELETE FROM centre_members WHERE centre_id = ? AND user_id = ?";
const SELECT_MEMBERS: &str = "SELECT u.* FROM users u JOIN centre_members m ON m.user_id = u.id WHERE m.centre_id = ? ORDER BY m.joined_at, u.first_name";
const SELECT_JOINED: &str = "SELECT c.* FROM fitness_centres c JOIN centre_members m ON m.centre_id = c.id WHERE m.user_id = ? ORDER BY c.name";

/// `SQLite`-backed fitness centre repository.
#[derive(Clone)]
pub struct SqliteFitnessCentreRepository {
    pool: SqlitePool,
}

impl SqliteFitnessCentreRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FitnessCentreRepository for SqliteFitnessCentreRepository {
    fn create(
        &self,
        centre: FitnessCentre,
    ) -> impl Future<Output = Result<FitnessCentre, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(centre.id.to_string())
                .bind(&centre.code)
                .bind(centre.owner_id.to_string())
                .bind(&centre.name)
                .bind(&centre.address)
                .bind(&centre.phone_number)
                .bind(&centre.zip_code)
                .bind(&centre.description)
                .bind(centre.created_on.to_rfc3339())
                .bind(centre.updated_on.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(unique_violation_as(ConflictError::CentreAlreadyRegistered))?;

            Ok(centre)
        }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Option<FitnessCentre>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_OWNER)
                .bind(owner_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn add_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_MEMBER)
                .bind(centre_id.to_string())
                .bind(user_id.to_string())
                .bind(now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn remove_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_MEMBER)
                .bind(centre_id.to_string())
                .bind(user_id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn list_members(
        &self,
        centre_id: FitnessCentreId,
    ) -> impl Future<Output = Result<Vec<User>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<UserRow> = sqlx::query_as(SELECT_MEMBERS)
                .bind(centre_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn list_joined(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<FitnessCentre>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_JOINED)
                .bind(user_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::user_repo::SqliteUserRepository;
    use gymdesk_app::ports::UserRepository;

    struct Fixture {
        centres: SqliteFitnessCentreRepository,
        owner: User,
        member: User,
    }

    async fn setup() -> Fixture {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let users = SqliteUserRepository::new(db.pool().clone());
        let owner = User::builder()
            .first_name("Priya")
            .email("priya@gym.test")
            .partner(true)
            .build()
            .unwrap();
        let member = User::builder()
            .first_name("Arjun")
            .email("arjun@gym.test")
            .build()
            .unwrap();
        users.create(owner.clone()).await.unwrap();
        users.create(member.clone()).await.unwrap();
        Fixture {
            centres: SqliteFitnessCentreRepository::new(db.pool().clone()),
            owner,
            member,
        }
    }

    fn centre(owner: &User) -> FitnessCentre {
        FitnessCentre::builder()
            .owner_id(owner.id)
            .name("Iron Temple")
            .address("12 MG Road")
            .phone_number("0801234567")
            .description(Some("Open all week".to_string()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_find_centre_by_owner() {
        let f = setup().await;
        let created = f.centres.create(centre(&f.owner)).await.unwrap();

        let found = f.centres.find_by_owner(f.owner.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.code, created.code);
        assert_eq!(found.description.as_deref(), Some("Open all week"));
        assert!(f.centres.find_by_owner(f.member.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_allow_one_centre_per_owner() {
        let f = setup().await;
        f.centres.create(centre(&f.owner)).await.unwrap();

        let result = f.centres.create(centre(&f.owner)).await;
        assert!(matches!(
            result,
            Err(GymError::Conflict(ConflictError::CentreAlreadyRegistered))
        ));
    }

    #[tokio::test]
    async fn should_add_list_and_remove_members() {
        let f = setup().await;
        let created = f.centres.create(centre(&f.owner)).await.unwrap();

        f.centres.add_member(created.id, f.member.id).await.unwrap();
        f.centres.add_member(created.id, f.member.id).await.unwrap();

        let members = f.centres.list_members(created.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, f.member.id);

        let joined = f.centres.list_joined(f.member.id).await.unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].id, created.id);

        assert!(f.centres.remove_member(created.id, f.member.id).await.unwrap());
        assert!(!f.centres.remove_member(created.id, f.member.id).await.unwrap());
        assert!(f.centres.list_members(created.id).await.unwrap().is_empty());
    }
}
