//! Shared application state for axum handlers.

use std::sync::Arc;

use gymdesk_app::ports::{
    AttendanceRepository, Clock, FitnessCentreRepository, InterchangeRepository,
    ShiftRepository, StaffRepository, UserRepository, WorkoutRepository,
};
use gymdesk_app::services::account_service::AccountService;
use gymdesk_app::services::attendance_service::AttendanceService;
use gymdesk_app::services::centre_service::CentreService;
use gymdesk_app::services::interchange_service::InterchangeService;
use gymdesk_app::services::shift_service::ShiftService;
use gymdesk_app::services::workout_service::WorkoutService;

/// The concrete adapters the API runs on.
///
/// Bundles every port type behind one parameter. Implemented on a marker type
/// by the composition root and by tests.
pub trait Ports: Send + Sync + 'static {
    type Users: UserRepository + Send + Sync + 'static;
    type Staff: StaffRepository + Send + Sync + 'static;
    type Centres: FitnessCentreRepository + Send + Sync + 'static;
    type Shifts: ShiftRepository + Send + Sync + 'static;
    type Attendance: AttendanceRepository + Send + Sync + 'static;
    type Interchanges: InterchangeRepository + Send + Sync + 'static;
    type Workouts: WorkoutRepository + Send + Sync + 'static;
    type Clock: Clock + Send + Sync + 'static;
}

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so neither `P` nor the services need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<P: Ports> {
    /// Accounts, profiles and staff enrolment. Also resolves the caller.
    pub account_service: Arc<AccountService<P::Users, P::Staff>>,
    /// Fitness centres and their rosters.
    pub centre_service: Arc<CentreService<P::Centres, P::Users>>,
    /// Shifts and weekly offs.
    pub shift_service: Arc<ShiftService<P::Staff, P::Shifts>>,
    /// Attendance marking and history.
    pub attendance_service:
        Arc<AttendanceService<P::Staff, P::Shifts, P::Attendance, P::Clock>>,
    /// Shift interchange requests.
    pub interchange_service:
        Arc<InterchangeService<P::Users, P::Staff, P::Shifts, P::Interchanges>>,
    /// Body parts and exercises.
    pub workout_service: Arc<WorkoutService<P::Workouts>>,
}

impl<P: Ports> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
            centre_service: Arc::clone(&self.centre_service),
            shift_service: Arc::clone(&self.shift_service),
            attendance_service: Arc::clone(&self.attendance_service),
            interchange_service: Arc::clone(&self.interchange_service),
            workout_service: Arc::clone(&self.workout_service),
        }
    }
}

impl<P: Ports> AppState<P> {
    /// Create a new application state from service instances.
    pub fn new(
        account_service: AccountService<P::Users, P::Staff>,
        centre_service: CentreService<P::Centres, P::Users>,
        shift_service: ShiftService<P::Staff, P::Shifts>,
        attendance_service: AttendanceService<P::Staff, P::Shifts, P::Attendance, P::Clock>,
        interchange_service: InterchangeService<P::Users, P::Staff, P::Shifts, P::Interchanges>,
        workout_service: WorkoutService<P::Workouts>,
    ) -> Self {
        Self {
            account_service: Arc::new(account_service),
            centre_service: Arc::new(centre_service),
            shift_service: Arc::new(shift_service),
            attendance_service: Arc::new(attendance_service),
            interchange_service: Arc::new(interchange_service),
            workout_service: Arc::new(workout_service),
        }
    }
}
