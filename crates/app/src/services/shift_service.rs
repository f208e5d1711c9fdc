//! Shift service — shift and weekly-off scheduling.

use chrono::NaiveTime;
use gymdesk_domain::day::Day;
use gymdesk_domain::error::{GymError, RuleViolation};
use gymdesk_domain::shift::Shift;
use gymdesk_domain::staff::{StaffMember, validate_weekly_off};
use gymdesk_domain::user::User;

use crate::ports::{ShiftRepository, StaffRepository};
use crate::services::access::{managed_staff, own_staff_record};

/// Application service for staff schedules.
pub struct ShiftService<S, SH> {
    staff: S,
    shifts: SH,
}

impl<S: StaffRepository, SH: ShiftRepository> ShiftService<S, SH> {
    /// Create a new service backed by the given repositories.
    pub fn new(staff: S, shifts: SH) -> Self {
        Self { staff, shifts }
    }

    /// Set the hours of `employee_id` on `day`, replacing any existing shift
    /// for that day.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::NotFound`] when the employee does not report to them,
    /// [`GymError::Validation`] unless `start < end`,
    /// [`RuleViolation::ShiftOnWeeklyOff`] when `day` is a weekly off, or a
    /// storage error.
    #[tracing::instrument(skip(self, manager), fields(manager_id = %manager.id))]
    pub async fn assign_shift(
        &self,
        manager: &User,
        employee_id: &str,
        day: Day,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Shift, GymError> {
        let staff = managed_staff(&self.staff, manager, employee_id).await?;
        if staff.is_off_on(day) {
            return Err(RuleViolation::ShiftOnWeeklyOff(day).into());
        }
        let shift = match self.shifts.find_by_staff_and_day(staff.id, day).await? {
            Some(mut existing) => {
                existing.reschedule(start, end)?;
                self.shifts.update(existing).await?
            }
            None => {
                let shift = Shift::new(staff.id, day, start, end)?;
                self.shifts.create(shift).await?
            }
        };
        tracing::info!(shift_id = %shift.id, "shift assigned");
        Ok(shift)
    }

    /// Set the weekly offs of `employee_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::NotFound`] when the employee does not report to them,
    /// [`GymError::Validation`] unless `days` holds exactly two distinct days,
    /// [`RuleViolation::ShiftOnWeeklyOff`] when a day already has a shift, or
    /// a storage error.
    #[tracing::instrument(skip(self, manager), fields(manager_id = %manager.id))]
    pub async fn assign_weekly_off(
        &self,
        manager: &User,
        employee_id: &str,
        days: Vec<Day>,
    ) -> Result<StaffMember, GymError> {
        let mut staff = managed_staff(&self.staff, manager, employee_id).await?;
        validate_weekly_off(&days)?;
        for day in &days {
            if self
                .shifts
                .find_by_staff_and_day(staff.id, *day)
                .await?
                .is_some()
            {
                return Err(RuleViolation::ShiftOnWeeklyOff(*day).into());
            }
        }
        staff.set_weekly_off(days)?;
        let staff = self.staff.update(staff).await?;
        tracing::info!(weekly_off = ?staff.weekly_off, "weekly offs assigned");
        Ok(staff)
    }

    /// Shifts of the calling staff member.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `caller` is staff,
    /// [`RuleViolation::NotStaffMember`] without an employment record, or a
    /// storage error.
    pub async fn own_shifts(&self, caller: &User) -> Result<Vec<Shift>, GymError> {
        let staff = own_staff_record(&self.staff, caller).await?;
        self.shifts.list_by_staff(staff.id).await
    }

    /// Shifts of one of `manager`'s employees.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::NotFound`] when the employee does not report to them, or a
    /// storage error.
    pub async fn staff_shifts(
        &self,
        manager: &User,
        employee_id: &str,
    ) -> Result<Vec<Shift>, GymError> {
        let staff = managed_staff(&self.staff, manager, employee_id).await?;
        self.shifts.list_by_staff(staff.id).await
    }
}
