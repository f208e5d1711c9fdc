//! Shift interchange — a request from one staff member to swap shift hours
//! with a colleague on the same weekday.
//!
//! The request moves through a small state machine:
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```
//!
//! Approved and rejected are terminal. Approval also swaps the hours of the
//! two shifts; persisting both shifts and the status is the storage
//! adapter's job and must happen atomically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GymError, RuleViolation, ValidationError};
use crate::id::{InterchangeRequestId, ShiftId, StaffMemberId};
use crate::shift::{Shift, swap_hours};
use crate::time::{Timestamp, now};

/// Lifecycle state of an interchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterchangeStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl InterchangeStatus {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for InterchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterchangeStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// A decision the target staff member can take on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for InterchangeStatus {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

/// Request to swap the hours of `requester_shift` and `target_shift`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInterchangeRequest {
    pub id: InterchangeRequestId,
    pub requester_id: StaffMemberId,
    pub target_id: StaffMemberId,
    pub requester_shift_id: ShiftId,
    pub target_shift_id: ShiftId,
    pub status: InterchangeStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShiftInterchangeRequest {
    /// Open a pending request between two shifts.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InterchangeWithSelf`] when both shifts belong
    /// to the same staff member, or [`RuleViolation::InterchangeDayMismatch`]
    /// when they fall on different weekdays.
    pub fn open(requester_shift: &Shift, target_shift: &Shift) -> Result<Self, GymError> {
        check_swappable(requester_shift, target_shift)?;
        let ts = now();
        Ok(Self {
            id: InterchangeRequestId::new(),
            requester_id: requester_shift.staff_member_id,
            target_id: target_shift.staff_member_id,
            requester_shift_id: requester_shift.id,
            target_shift_id: target_shift.id,
            status: InterchangeStatus::Pending,
            created_at: ts,
            updated_at: ts,
        })
    }

    /// Whether `staff` is either party of the request.
    #[must_use]
    pub fn involves(&self, staff: StaffMemberId) -> bool {
        self.requester_id == staff || self.target_id == staff
    }

    /// Move to `status`, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InterchangeNotPending`] if the request is
    /// already approved or rejected.
    pub fn transition(&mut self, decision: Decision) -> Result<(), GymError> {
        if self.status.is_terminal() {
            return Err(RuleViolation::InterchangeNotPending.into());
        }
        self.status = decision.into();
        self.updated_at = now();
        Ok(())
    }

    /// Approve the request and swap the hours of the two shifts in memory.
    ///
    /// The shifts must be the ones referenced by this request and must still
    /// satisfy the interchange preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InterchangeNotPending`] for a decided request,
    /// [`ValidationError::InvalidId`] when a shift does not match the request,
    /// or the errors of [`ShiftInterchangeRequest::open`] when the shifts
    /// drifted apart since the request was made. Nothing is modified on error.
    pub fn approve(
        &mut self,
        requester_shift: &mut Shift,
        target_shift: &mut Shift,
    ) -> Result<(), GymError> {
        if self.status.is_terminal() {
            return Err(RuleViolation::InterchangeNotPending.into());
        }
        if requester_shift.id != self.requester_shift_id
            || requester_shift.staff_member_id != self.requester_id
        {
            return Err(ValidationError::InvalidId(requester_shift.id.to_string()).into());
        }
        if target_shift.id != self.target_shift_id
            || target_shift.staff_member_id != self.target_id
        {
            return Err(ValidationError::InvalidId(target_shift.id.to_string()).into());
        }
        check_swappable(requester_shift, target_shift)?;

        self.transition(Decision::Approved)?;
        swap_hours(requester_shift, target_shift);
        Ok(())
    }
}

fn check_swappable(requester_shift: &Shift, target_shift: &Shift) -> Result<(), GymError> {
    if requester_shift.staff_member_id == target_shift.staff_member_id {
        return Err(RuleViolation::InterchangeWithSelf.into());
    }
    if requester_shift.day != target_shift.day {
        return Err(RuleViolation::InterchangeDayMismatch.into());
    }
    Ok(())
}
