//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`GymError`]
//! via `#[from]`. Business-rule violations carry a stable snake_case code so
//! clients can branch on them without parsing messages.

use crate::day::Day;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum GymError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Rule(#[from] RuleViolation),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that violates a structural invariant of a domain object.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("shift must start before it ends")]
    InvalidShiftHours,

    #[error("exactly two weekly off days are required, got {0}")]
    WeeklyOffCount(usize),

    #[error("weekly off days must be distinct")]
    DuplicateWeeklyOff,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// A looked-up record does not exist (or is not visible to the caller).
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The caller lacks the role or ownership required for an operation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PermissionError {
    #[error("this action requires the {0} role")]
    RoleRequired(&'static str),

    #[error("only partners can register a fitness centre")]
    PartnerRequired,

    #[error("only the targeted staff member can decide on this interchange request")]
    NotInterchangeTarget,
}

/// The operation would break a uniqueness rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConflictError {
    #[error("email already exists")]
    EmailAlreadyExists,

    #[error("user already owns a fitness centre")]
    CentreAlreadyRegistered,

    #[error("an identical interchange request is already pending")]
    InterchangeAlreadyPending,

    #[error("duplicate {0}")]
    Duplicate(&'static str),
}

/// A business rule rejected an otherwise well-formed request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("today is {0}, a weekly off day; attendance cannot be marked")]
    WeeklyOffToday(Day),

    #[error("no shift found for today")]
    NoShiftForToday,

    #[error("attendance can only be marked within shift hours")]
    OutOfShiftHours,

    #[error("attendance can only be marked shortly after the shift starts")]
    OutOfAttendanceWindow,

    #[error("attendance already marked today")]
    AttendanceAlreadyMarked,

    #[error("cannot assign a shift on a weekly off day ({0})")]
    ShiftOnWeeklyOff(Day),

    #[error("both shifts must fall on the same day")]
    InterchangeDayMismatch,

    #[error("a staff member cannot interchange shifts with themselves")]
    InterchangeWithSelf,

    #[error("both staff members must report to the same manager")]
    InterchangeAcrossTeams,

    #[error("interchange request is no longer pending")]
    InterchangeNotPending,

    #[error("user is not a staff member")]
    NotStaffMember,
}

impl RuleViolation {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::WeeklyOffToday(_) => "weekly_off_today",
            Self::NoShiftForToday => "no_shift_for_today",
            Self::OutOfShiftHours => "out_of_shift_hours",
            Self::OutOfAttendanceWindow => "out_of_attendance_window",
            Self::AttendanceAlreadyMarked => "attendance_already_marked",
            Self::ShiftOnWeeklyOff(_) => "shift_on_weekly_off",
            Self::InterchangeDayMismatch => "interchange_day_mismatch",
            Self::InterchangeWithSelf => "interchange_with_self",
            Self::InterchangeAcrossTeams => "interchange_across_teams",
            Self::InterchangeNotPending => "interchange_not_pending",
            Self::NotStaffMember => "not_staff_member",
        }
    }
}

impl GymError {
    /// Stable machine-readable code for any error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Permission(_) => "permission_denied",
            Self::Conflict(ConflictError::EmailAlreadyExists) => "email_already_exists",
            Self::Conflict(ConflictError::CentreAlreadyRegistered) => "centre_already_registered",
            Self::Conflict(ConflictError::InterchangeAlreadyPending) => {
                "interchange_already_pending"
            }
            Self::Conflict(ConflictError::Duplicate(_)) => "duplicate",
            Self::Rule(rule) => rule.code(),
            Self::Storage(_) => "internal_error",
        }
    }

    /// Shorthand for a [`NotFoundError`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into()
    }
}
