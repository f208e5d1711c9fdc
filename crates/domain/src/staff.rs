//! Staff member — a user employed by a manager, with an employee id and
//! weekly off days.

use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::{GymError, ValidationError};
use crate::id::{StaffMemberId, UserId};
use crate::user::User;

/// Number of weekly off days every schedule carries.
pub const WEEKLY_OFF_DAYS: usize = 2;

/// Employment record linking a staff user to their manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffMemberId,
    pub user_id: UserId,
    pub manager_id: UserId,
    /// Public employee code (`emp_xxxxxx`), what managers address staff by.
    pub employee_id: String,
    /// Empty until a manager assigns the weekly offs.
    pub weekly_off: Vec<Day>,
}

impl StaffMember {
    /// Create a fresh record with a generated employee id and no weekly offs.
    #[must_use]
    pub fn new(user_id: UserId, manager_id: UserId) -> Self {
        Self {
            id: StaffMemberId::new(),
            user_id,
            manager_id,
            employee_id: generate_employee_id(),
            weekly_off: Vec::new(),
        }
    }

    /// Whether `day` is one of this member's weekly offs.
    #[must_use]
    pub fn is_off_on(&self, day: Day) -> bool {
        self.weekly_off.contains(&day)
    }

    /// Whether this member reports to `manager_id`.
    #[must_use]
    pub fn reports_to(&self, manager_id: UserId) -> bool {
        self.manager_id == manager_id
    }

    /// Replace the weekly offs after validating them.
    ///
    /// # Errors
    ///
    /// See [`validate_weekly_off`].
    pub fn set_weekly_off(&mut self, days: Vec<Day>) -> Result<(), GymError> {
        validate_weekly_off(&days)?;
        self.weekly_off = days;
        Ok(())
    }
}

/// Weekly offs are exactly [`WEEKLY_OFF_DAYS`] distinct days.
///
/// # Errors
///
/// Returns [`ValidationError::WeeklyOffCount`] or
/// [`ValidationError::DuplicateWeeklyOff`].
pub fn validate_weekly_off(days: &[Day]) -> Result<(), GymError> {
    if days.len() != WEEKLY_OFF_DAYS {
        return Err(ValidationError::WeeklyOffCount(days.len()).into());
    }
    if days[0] == days[1] {
        return Err(ValidationError::DuplicateWeeklyOff.into());
    }
    Ok(())
}

/// Generate an employee id such as `emp_1a2b3c`.
#[must_use]
pub fn generate_employee_id() -> String {
    crate::short_code("emp")
}

/// Read model combining the employment record with the user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMemberProfile {
    #[serde(flatten)]
    pub staff: StaffMember,
    pub user: User,
}
