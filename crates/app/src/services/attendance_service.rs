//! Attendance service — marking attendance under the attendance policy.

use chrono::Datelike;
use gymdesk_domain::attendance::{Attendance, AttendancePolicy};
use gymdesk_domain::day::Day;
use gymdesk_domain::error::GymError;
use gymdesk_domain::user::User;

use crate::ports::{AttendanceRepository, Clock, ShiftRepository, StaffRepository};
use crate::services::access::{managed_staff, own_staff_record};

/// Application service for staff attendance.
pub struct AttendanceService<S, SH, A, C> {
    staff: S,
    shifts: SH,
    attendance: A,
    clock: C,
    policy: AttendancePolicy,
}

impl<S, SH, A, C> AttendanceService<S, SH, A, C>
where
    S: StaffRepository,
    SH: ShiftRepository,
    A: AttendanceRepository,
    C: Clock,
{
    /// Create a new service backed by the given repositories, reading time
    /// from `clock` and judging it with `policy`.
    pub fn new(staff: S, shifts: SH, attendance: A, clock: C, policy: AttendancePolicy) -> Self {
        Self {
            staff,
            shifts,
            attendance,
            clock,
            policy,
        }
    }

    /// Mark attendance for the calling staff member, now.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `caller` is staff,
    /// [`GymError::Rule`] for the first failing attendance precondition, or a
    /// storage error.
    #[tracing::instrument(skip(self, caller, image_ref), fields(user_id = %caller.id))]
    pub async fn mark_attendance(
        &self,
        caller: &User,
        image_ref: Option<String>,
    ) -> Result<Attendance, GymError> {
        let staff = own_staff_record(&self.staff, caller).await?;
        let now = self.clock.now();
        let local = self.policy.local_time(now);
        let today = Day::from(local.weekday());

        let shift = self.shifts.find_by_staff_and_day(staff.id, today).await?;
        let already_marked = self
            .attendance
            .exists_for_date(staff.id, local.date())
            .await?;

        if let Err(err) = self
            .policy
            .evaluate(&staff, shift.as_ref(), already_marked, local)
        {
            tracing::warn!(code = err.code(), %local, "attendance refused");
            return Err(err);
        }

        let attendance = self
            .attendance
            .create(Attendance::new(staff.id, local.date(), now, image_ref))
            .await?;
        tracing::info!(attendance_id = %attendance.id, date = %attendance.date, "attendance marked");
        Ok(attendance)
    }

    /// Attendance history of the calling staff member.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `caller` is staff, or a
    /// storage error.
    pub async fn own_attendance(&self, caller: &User) -> Result<Vec<Attendance>, GymError> {
        let staff = own_staff_record(&self.staff, caller).await?;
        self.attendance.list_by_staff(staff.id).await
    }

    /// Attendance history of one of `manager`'s employees.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::NotFound`] when the employee does not report to them, or a
    /// storage error.
    pub async fn staff_attendance(
        &self,
        manager: &User,
        employee_id: &str,
    ) -> Result<Vec<Attendance>, GymError> {
        let staff = managed_staff(&self.staff, manager, employee_id).await?;
        self.attendance.list_by_staff(staff.id).await
    }
}
