//! # gymdeskd — gymdesk daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`gymdesk.toml`, environment overrides)
//! - Initialise `tracing` with the configured filter
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It only wires things together; domain logic lives elsewhere.

mod config;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use gymdesk_adapter_http_axum::state::{AppState, Ports};
use gymdesk_adapter_storage_sqlite_sqlx::{
    SqliteAttendanceRepository, SqliteFitnessCentreRepository, SqliteInterchangeRepository,
    SqliteShiftRepository, SqliteStaffRepository, SqliteUserRepository, SqliteWorkoutRepository,
};
use gymdesk_app::ports::SystemClock;
use gymdesk_app::services::account_service::AccountService;
use gymdesk_app::services::attendance_service::AttendanceService;
use gymdesk_app::services::centre_service::CentreService;
use gymdesk_app::services::interchange_service::InterchangeService;
use gymdesk_app::services::shift_service::ShiftService;
use gymdesk_app::services::workout_service::WorkoutService;

use crate::config::Config;

/// `SQLite` repositories on the system clock.
struct SqlitePorts;

impl Ports for SqlitePorts {
    type Users = SqliteUserRepository;
    type Staff = SqliteStaffRepository;
    type Centres = SqliteFitnessCentreRepository;
    type Shifts = SqliteShiftRepository;
    type Attendance = SqliteAttendanceRepository;
    type Interchanges = SqliteInterchangeRepository;
    type Workouts = SqliteWorkoutRepository;
    type Clock = SystemClock;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let policy = config.attendance_policy()?;

    // Database
    let db = gymdesk_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories
    let users = SqliteUserRepository::new(pool.clone());
    let staff = SqliteStaffRepository::new(pool.clone());
    let centres = SqliteFitnessCentreRepository::new(pool.clone());
    let shifts = SqliteShiftRepository::new(pool.clone());
    let attendance = SqliteAttendanceRepository::new(pool.clone());
    let interchanges = SqliteInterchangeRepository::new(pool.clone());
    let workouts = SqliteWorkoutRepository::new(pool);

    // Services
    let account_service = AccountService::new(users.clone(), staff.clone());
    let centre_service = CentreService::new(centres, users.clone());
    let shift_service = ShiftService::new(staff.clone(), shifts.clone());
    let attendance_service = AttendanceService::new(
        staff.clone(),
        shifts.clone(),
        attendance,
        SystemClock,
        policy,
    );
    let interchange_service = InterchangeService::new(users, staff, shifts, interchanges);
    let workout_service = WorkoutService::new(workouts);

    // HTTP
    let state: AppState<SqlitePorts> = AppState::new(
        account_service,
        centre_service,
        shift_service,
        attendance_service,
        interchange_service,
        workout_service,
    );
    let app = gymdesk_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "gymdeskd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("gymdeskd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => {
                tracing::error!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
