//! `SQLite` implementation of [`WorkoutRepository`].
//!
//! The catalogue ships with the migrations; this adapter only reads it.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymdesk_app::ports::WorkoutRepository;
use gymdesk_domain::error::GymError;
use gymdesk_domain::id::BodyPartId;
use gymdesk_domain::workout::{BodyPart, BodyPartType, Exercise};

use crate::codec::parse;
use crate::error::StorageError;

struct BodyPartRow(BodyPart);

impl<'r> FromRow<'r, SqliteRow> for BodyPartRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let kind: String = row.try_get("type")?;

        Ok(Self(BodyPart {
            id: parse(&id)?,
            name: row.try_get("name")?,
            kind: parse(&kind)?,
            image_ref: row.try_get("image_ref")?,
        }))
    }
}

struct ExerciseRow(Exercise);

impl<'r> FromRow<'r, SqliteRow> for ExerciseRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        // comma-separated, from GROUP_CONCAT
        let body_part_ids: String = row.try_get("body_part_ids")?;
        let mut body_part_ids = body_part_ids
            .split(',')
            .filter(|raw| !raw.is_empty())
            .map(parse)
            .collect::<Result<Vec<BodyPartId>, _>>()?;
        body_part_ids.sort();

        Ok(Self(Exercise {
            id: parse(&id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            explanation: row.try_get("explanation")?,
            body_part_ids,
        }))
    }
}

const SELECT_BODY_PARTS: &str = "SELECT * FROM body_parts WHERE ?1 IS NULL OR type = ?1 ORDER BY CASE type WHEN 'upper' THEN 0 ELSE 1 END, name";
const SELECT_BODY_PART: &str = "SELECT * FROM body_parts WHERE id = ?";
const SELECT_EXERCISES_FOR: &str = "SELECT e.id, e.name, e.description, e.explanation, \
     (SELECT GROUP_CONCAT(x.body_part_id) FROM exercise_body_parts x WHERE x.exercise_id = e.id) AS body_part_ids \
     FROM exercises e JOIN exercise_body_parts eb ON eb.exercise_id = e.id \
     WHERE eb.body_part_id = ? ORDER BY e.name";

/// `SQLite`-backed workout catalogue.
#[derive(Clone)]
pub struct SqliteWorkoutRepository {
    pool: SqlitePool,
}

impl SqliteWorkoutRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl WorkoutRepository for SqliteWorkoutRepository {
    fn list_body_parts(
        &self,
        kind: Option<BodyPartType>,
    ) -> impl Future<Output = Result<Vec<BodyPart>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<BodyPartRow> = sqlx::query_as(SELECT_BODY_PARTS)
                .bind(kind.map(BodyPartType::as_str))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn get_body_part(
        &self,
        id: BodyPartId,
    ) -> impl Future<Output = Result<Option<BodyPart>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<BodyPartRow> = sqlx::query_as(SELECT_BODY_PART)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list_exercises_for(
        &self,
        body_part_id: BodyPartId,
    ) -> impl Future<Output = Result<Vec<Exercise>, GymError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<ExerciseRow> = sqlx::query_as(SELECT_EXERCISES_FOR)
                .bind(body_part_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn repo() -> SqliteWorkoutRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteWorkoutRepository::new(db.pool().clone())
    }

    async fn body_part(repo: &SqliteWorkoutRepository, name: &str) -> BodyPart {
        repo.list_body_parts(None)
            .await
            .unwrap()
            .into_iter()
            .find(|part| part.name == name)
            .unwrap()
    }

    #[tokio::test]
    async fn should_list_seeded_body_parts_upper_first() {
        let repo = repo().await;

        let all = repo.list_body_parts(None).await.unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].kind, BodyPartType::Upper);
        assert_eq!(all[all.len() - 1].kind, BodyPartType::Lower);

        let lower: Vec<String> = repo
            .list_body_parts(Some(BodyPartType::Lower))
            .await
            .unwrap()
            .into_iter()
            .map(|part| part.name)
            .collect();
        assert_eq!(lower, vec!["calves", "glutes", "hamstrings", "quadriceps"]);
    }

    #[tokio::test]
    async fn should_get_body_part_by_id() {
        let repo = repo().await;
        let chest = body_part(&repo, "chest").await;

        let fetched = repo.get_body_part(chest.id).await.unwrap();
        assert_eq!(fetched, Some(chest));
        assert!(repo.get_body_part(BodyPartId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_list_exercises_with_all_their_body_parts() {
        let repo = repo().await;
        let chest = body_part(&repo, "chest").await;
        let triceps = body_part(&repo, "triceps").await;

        let exercises = repo.list_exercises_for(chest.id).await.unwrap();
        let names: Vec<&str> = exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bench Press", "Push-up", "Tricep Dip"]);

        let push_up = &exercises[1];
        assert!(push_up.trains(chest.id));
        assert!(push_up.trains(triceps.id));
        assert_eq!(push_up.body_part_ids.len(), 2);
    }
}
