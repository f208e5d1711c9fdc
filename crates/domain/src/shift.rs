//! Shift — the working hours of one staff member on one weekday.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::{GymError, ValidationError};
use crate::id::{ShiftId, StaffMemberId};
use crate::time::hhmm;

/// Weekly recurring shift. A staff member has at most one shift per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub staff_member_id: StaffMemberId,
    pub day: Day,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Shift {
    /// Create a new shift, validating its hours.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidShiftHours`] unless `start < end`.
    pub fn new(
        staff_member_id: StaffMemberId,
        day: Day,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, GymError> {
        let shift = Self {
            id: ShiftId::new(),
            staff_member_id,
            day,
            start,
            end,
        };
        shift.validate()?;
        Ok(shift)
    }

    /// Check domain invariants. Overnight shifts are not supported.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidShiftHours`] unless `start < end`.
    pub fn validate(&self) -> Result<(), GymError> {
        if self.start >= self.end {
            return Err(ValidationError::InvalidShiftHours.into());
        }
        Ok(())
    }

    /// Whether `time` falls inside `[start, end]`.
    #[must_use]
    pub fn covers(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// Replace the hours, keeping id, owner and day.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidShiftHours`] unless `start < end`;
    /// the shift is left untouched in that case.
    pub fn reschedule(&mut self, start: NaiveTime, end: NaiveTime) -> Result<(), GymError> {
        if start >= end {
            return Err(ValidationError::InvalidShiftHours.into());
        }
        self.start = start;
        self.end = end;
        Ok(())
    }
}

/// Exchange the hours of two shifts. Owners, ids and days stay in place.
pub fn swap_hours(a: &mut Shift, b: &mut Shift) {
    std::mem::swap(&mut a.start, &mut b.start);
    std::mem::swap(&mut a.end, &mut b.end);
}
