//! Storage ports — repository traits for every persisted aggregate.

use std::future::Future;

use chrono::NaiveDate;
use gymdesk_domain::{
    attendance::Attendance,
    day::Day,
    error::GymError,
    fitness_centre::FitnessCentre,
    id::{BodyPartId, FitnessCentreId, InterchangeRequestId, ShiftId, StaffMemberId, UserId},
    interchange::ShiftInterchangeRequest,
    shift::Shift,
    staff::{StaffMember, StaffMemberProfile},
    user::User,
    workout::{BodyPart, BodyPartType, Exercise},
};

/// Repository for user accounts.
pub trait UserRepository {
    /// Persist a new user.
    ///
    /// Adapters report a taken email as a conflict.
    fn create(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send;

    /// Get a user by id.
    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>, GymError>> + Send;

    /// Find a user by email (exact match).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send;

    /// Find a user by phone number.
    fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send;

    /// Update an existing user.
    fn update(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send;
}

/// Repository for employment records.
pub trait StaffRepository {
    /// Persist a new staff user and their employment record in one unit.
    fn enroll(
        &self,
        user: User,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMemberProfile, GymError>> + Send;

    /// Get an employment record by id.
    fn get_by_id(
        &self,
        id: StaffMemberId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send;

    /// Find a record by its public employee id.
    fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send;

    /// Find the employment record of a user.
    fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send;

    /// List every staff member reporting to `manager_id`, with their profile.
    fn list_by_manager(
        &self,
        manager_id: UserId,
    ) -> impl Future<Output = Result<Vec<StaffMemberProfile>, GymError>> + Send;

    /// Update an employment record (weekly offs).
    fn update(
        &self,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMember, GymError>> + Send;
}

/// Repository for fitness centres and their member roster.
pub trait FitnessCentreRepository {
    /// Persist a new centre.
    ///
    /// Adapters report a second centre for the same owner as a conflict.
    fn create(
        &self,
        centre: FitnessCentre,
    ) -> impl Future<Output = Result<FitnessCentre, GymError>> + Send;

    /// Find the centre owned by `owner_id`.
    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Option<FitnessCentre>, GymError>> + Send;

    /// Add a member to a centre. Adding an existing member is a no-op.
    fn add_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), GymError>> + Send;

    /// Remove a member from a centre, returning whether they were a member.
    fn remove_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, GymError>> + Send;

    /// List the members of a centre.
    fn list_members(
        &self,
        centre_id: FitnessCentreId,
    ) -> impl Future<Output = Result<Vec<User>, GymError>> + Send;

    /// List the centres `user_id` has joined.
    fn list_joined(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<FitnessCentre>, GymError>> + Send;
}

/// Repository for weekly shifts.
pub trait ShiftRepository {
    /// Persist a new shift.
    ///
    /// Adapters report a second shift for the same staff member and day as a
    /// conflict.
    fn create(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send;

    /// Update the hours of an existing shift.
    fn update(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send;

    /// Get a shift by id.
    fn get_by_id(&self, id: ShiftId)
    -> impl Future<Output = Result<Option<Shift>, GymError>> + Send;

    /// Find the shift of a staff member on a weekday.
    fn find_by_staff_and_day(
        &self,
        staff_member_id: StaffMemberId,
        day: Day,
    ) -> impl Future<Output = Result<Option<Shift>, GymError>> + Send;

    /// List every shift of a staff member, Monday first.
    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Shift>, GymError>> + Send;
}

/// Repository for attendance records.
pub trait AttendanceRepository {
    /// Persist a new attendance.
    ///
    /// Adapters report a second attendance for the same staff member and date
    /// as [`RuleViolation::AttendanceAlreadyMarked`](gymdesk_domain::error::RuleViolation).
    fn create(
        &self,
        attendance: Attendance,
    ) -> impl Future<Output = Result<Attendance, GymError>> + Send;

    /// Whether an attendance exists for `staff_member_id` on `date`.
    fn exists_for_date(
        &self,
        staff_member_id: StaffMemberId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<bool, GymError>> + Send;

    /// List the attendance history of a staff member, newest first.
    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Attendance>, GymError>> + Send;
}

/// Repository for shift interchange requests.
pub trait InterchangeRepository {
    /// Persist a new pending request.
    ///
    /// Adapters report a second pending request for the same pair of shifts
    /// as a conflict.
    fn create(
        &self,
        request: ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send;

    /// Get a request by id.
    fn get_by_id(
        &self,
        id: InterchangeRequestId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send;

    /// Find a pending request for the same pair of shifts.
    fn find_pending(
        &self,
        requester_shift_id: ShiftId,
        target_shift_id: ShiftId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send;

    /// List requests where `staff_member_id` is requester or target, newest
    /// first.
    fn list_for_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<ShiftInterchangeRequest>, GymError>> + Send;

    /// Persist a rejection.
    ///
    /// Only succeeds while the stored request is still pending; otherwise
    /// returns [`RuleViolation::InterchangeNotPending`](gymdesk_domain::error::RuleViolation).
    fn record_rejection(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<(), GymError>> + Send;

    /// Approve a pending request and swap the hours of its two shifts in one
    /// atomic write, returning the approved request.
    ///
    /// Both shifts are read inside the write and checked with
    /// [`ShiftInterchangeRequest::approve`], so the swap exchanges their
    /// current hours even when another approval touched one of them first.
    /// Nothing is written on error:
    /// [`RuleViolation::InterchangeNotPending`](gymdesk_domain::error::RuleViolation)
    /// once the stored request is decided, [`GymError::NotFound`] for a
    /// missing shift, or the errors of `approve`.
    fn approve_with_swap(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send;
}

/// Read access to the workout catalogue.
pub trait WorkoutRepository {
    /// List body parts, optionally of one type, ordered by type then name.
    fn list_body_parts(
        &self,
        kind: Option<BodyPartType>,
    ) -> impl Future<Output = Result<Vec<BodyPart>, GymError>> + Send;

    /// Get a body part by id.
    fn get_body_part(
        &self,
        id: BodyPartId,
    ) -> impl Future<Output = Result<Option<BodyPart>, GymError>> + Send;

    /// List the exercises working `body_part_id`, ordered by name.
    fn list_exercises_for(
        &self,
        body_part_id: BodyPartId,
    ) -> impl Future<Output = Result<Vec<Exercise>, GymError>> + Send;
}
