//! Storage-specific error type wrapping sqlx errors.

use gymdesk_domain::error::GymError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed, or a stored column could not be
    /// decoded (`sqlx::Error::Decode`, raised by the codec helpers).
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to serialize or deserialize a stored JSON value.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for GymError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map a failed write, turning a unique-constraint violation into `conflict`.
pub(crate) fn unique_violation_as(
    conflict: impl Into<GymError>,
) -> impl FnOnce(sqlx::Error) -> GymError {
    move |err| {
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
        {
            return conflict.into();
        }
        StorageError::from(err).into()
    }
}
