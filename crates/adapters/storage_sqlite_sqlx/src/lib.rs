//! # gymdesk-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `gymdesk-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Turn unique-constraint violations into domain conflicts
//!
//! ## Dependency rule
//! Depends on `gymdesk-app` (for port traits) and `gymdesk-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod codec;

pub mod attendance_repo;
pub mod centre_repo;
pub mod error;
pub mod interchange_repo;
pub mod pool;
pub mod shift_repo;
pub mod staff_repo;
pub mod user_repo;
pub mod workout_repo;

pub use attendance_repo::SqliteAttendanceRepository;
pub use centre_repo::SqliteFitnessCentreRepository;
pub use error::StorageError;
pub use interchange_repo::SqliteInterchangeRepository;
pub use pool::{Config, Database};
pub use shift_repo::SqliteShiftRepository;
pub use staff_repo::SqliteStaffRepository;
pub use user_repo::SqliteUserRepository;
pub use workout_repo::SqliteWorkoutRepository;
