//! Attendance — one record per staff member and local calendar day, plus the
//! policy deciding whether attendance may be marked right now.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::{GymError, RuleViolation, ValidationError};
use crate::id::{AttendanceId, StaffMemberId};
use crate::shift::Shift;
use crate::staff::StaffMember;
use crate::time::Timestamp;

/// Default centre offset from UTC, in minutes (UTC+05:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Default window after shift start during which attendance is accepted.
pub const DEFAULT_GRACE_MINUTES: u32 = 60;

const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// A marked attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub staff_member_id: StaffMemberId,
    /// Local calendar date the attendance counts for.
    pub date: NaiveDate,
    pub timestamp: Timestamp,
    /// Opaque reference to the check-in photo held by an external store.
    pub image_ref: Option<String>,
}

impl Attendance {
    #[must_use]
    pub fn new(
        staff_member_id: StaffMemberId,
        date: NaiveDate,
        timestamp: Timestamp,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            id: AttendanceId::new(),
            staff_member_id,
            date,
            timestamp,
            image_ref,
        }
    }
}

/// When staff may mark attendance.
///
/// Wall-clock time is converted to the centre's local time with a fixed
/// offset, then checked in order:
///
/// 1. today is not a weekly off,
/// 2. a shift exists for today,
/// 3. local time lies within `[start, end]` of that shift,
/// 4. local time is earlier than `start + grace`,
/// 5. attendance was not already marked for the local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePolicy {
    utc_offset: FixedOffset,
    grace: Duration,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
            grace: Duration::minutes(i64::from(DEFAULT_GRACE_MINUTES)),
        }
    }
}

impl AttendancePolicy {
    /// Build a policy from an offset east of UTC and a grace window.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] when the offset is beyond ±18 hours or
    /// the grace window is zero.
    pub fn new(utc_offset_minutes: i32, grace_minutes: u32) -> Result<Self, GymError> {
        if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(invalid("utc_offset_minutes", utc_offset_minutes));
        }
        let utc_offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or_else(|| invalid("utc_offset_minutes", utc_offset_minutes))?;
        if grace_minutes == 0 {
            return Err(invalid("grace_minutes", grace_minutes));
        }
        Ok(Self {
            utc_offset,
            grace: Duration::minutes(i64::from(grace_minutes)),
        })
    }

    /// Local date and time for a UTC instant.
    #[must_use]
    pub fn local_time(&self, now: Timestamp) -> NaiveDateTime {
        now.with_timezone(&self.utc_offset).naive_local()
    }

    /// Grace window after shift start.
    #[must_use]
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Run the full precondition chain for `local`.
    ///
    /// `shift_today` is the member's shift for the weekday of `local`, and
    /// `already_marked` whether an attendance exists for its date.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`RuleViolation`] as [`GymError::Rule`].
    pub fn evaluate(
        &self,
        staff: &StaffMember,
        shift_today: Option<&Shift>,
        already_marked: bool,
        local: NaiveDateTime,
    ) -> Result<(), GymError> {
        let today = Day::from(local.weekday());
        if staff.is_off_on(today) {
            return Err(RuleViolation::WeeklyOffToday(today).into());
        }

        let shift = shift_today.ok_or(RuleViolation::NoShiftForToday)?;

        if !shift.covers(local.time()) {
            return Err(RuleViolation::OutOfShiftHours.into());
        }

        let deadline = local.date().and_time(shift.start) + self.grace;
        if local >= deadline {
            return Err(RuleViolation::OutOfAttendanceWindow.into());
        }

        if already_marked {
            return Err(RuleViolation::AttendanceAlreadyMarked.into());
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: impl ToString) -> GymError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
    }
    .into()
}
