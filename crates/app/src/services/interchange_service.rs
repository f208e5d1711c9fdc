//! Interchange service — shift swap requests between staff members.

use gymdesk_domain::error::{ConflictError, GymError, PermissionError, RuleViolation};
use gymdesk_domain::id::{InterchangeRequestId, ShiftId, StaffMemberId};
use gymdesk_domain::interchange::{Decision, ShiftInterchangeRequest};
use gymdesk_domain::shift::Shift;
use gymdesk_domain::user::User;

use crate::ports::{InterchangeRepository, ShiftRepository, StaffRepository, UserRepository};
use crate::services::access::own_staff_record;

/// Application service for shift interchange requests.
pub struct InterchangeService<U, S, SH, I> {
    users: U,
    staff: S,
    shifts: SH,
    interchanges: I,
}

impl<U, S, SH, I> InterchangeService<U, S, SH, I>
where
    U: UserRepository,
    S: StaffRepository,
    SH: ShiftRepository,
    I: InterchangeRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(users: U, staff: S, shifts: SH, interchanges: I) -> Self {
        Self {
            users,
            staff,
            shifts,
            interchanges,
        }
    }

    /// Ask the staff member registered under `target_email` to swap
    /// `requester_shift_id` (the caller's) with `target_shift_id` (theirs).
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`GymError::Permission`] unless `caller` is staff,
    /// - [`GymError::NotFound`] when no account uses `target_email`,
    /// - [`RuleViolation::NotStaffMember`] when that account is not staff,
    /// - [`GymError::NotFound`] when either shift is missing or not owned by
    ///   its party,
    /// - [`RuleViolation::InterchangeWithSelf`] or
    ///   [`RuleViolation::InterchangeDayMismatch`],
    /// - [`RuleViolation::InterchangeAcrossTeams`] when the two report to
    ///   different managers,
    /// - [`ConflictError::InterchangeAlreadyPending`] for a duplicate.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn request_interchange(
        &self,
        caller: &User,
        target_email: &str,
        requester_shift_id: ShiftId,
        target_shift_id: ShiftId,
    ) -> Result<ShiftInterchangeRequest, GymError> {
        let requester = own_staff_record(&self.staff, caller).await?;

        let target_user = self
            .users
            .find_by_email(target_email)
            .await?
            .ok_or_else(|| GymError::not_found("User", target_email))?;
        let target = self
            .staff
            .find_by_user_id(target_user.id)
            .await?
            .ok_or(RuleViolation::NotStaffMember)?;

        let requester_shift = self.owned_shift(requester_shift_id, requester.id).await?;
        let target_shift = self.owned_shift(target_shift_id, target.id).await?;

        let request = ShiftInterchangeRequest::open(&requester_shift, &target_shift)?;

        if requester.manager_id != target.manager_id {
            return Err(RuleViolation::InterchangeAcrossTeams.into());
        }
        if self
            .interchanges
            .find_pending(requester_shift.id, target_shift.id)
            .await?
            .is_some()
        {
            return Err(ConflictError::InterchangeAlreadyPending.into());
        }

        let request = self.interchanges.create(request).await?;
        tracing::info!(request_id = %request.id, day = %requester_shift.day, "interchange requested");
        Ok(request)
    }

    /// Requests the calling staff member sent or received.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `caller` is staff, or a
    /// storage error.
    pub async fn list_requests(
        &self,
        caller: &User,
    ) -> Result<Vec<ShiftInterchangeRequest>, GymError> {
        let staff = own_staff_record(&self.staff, caller).await?;
        self.interchanges.list_for_staff(staff.id).await
    }

    /// Approve or reject request `id` as its target.
    ///
    /// Approval swaps the hours of both shifts and records the new status in
    /// one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when the request does not exist or does
    /// not involve the caller, [`PermissionError::NotInterchangeTarget`] when
    /// the caller is the requester, [`RuleViolation::InterchangeNotPending`]
    /// once decided, the interchange rules when the shifts changed since the
    /// request was made, or a storage error.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.id))]
    pub async fn update_status(
        &self,
        caller: &User,
        id: InterchangeRequestId,
        decision: Decision,
    ) -> Result<ShiftInterchangeRequest, GymError> {
        let staff = own_staff_record(&self.staff, caller).await?;
        let mut request = self
            .interchanges
            .get_by_id(id)
            .await?
            .filter(|request| request.involves(staff.id))
            .ok_or_else(|| GymError::not_found("InterchangeRequest", id))?;
        if request.target_id != staff.id {
            return Err(PermissionError::NotInterchangeTarget.into());
        }

        let outcome = match decision {
            Decision::Rejected => self.reject(&mut request).await,
            Decision::Approved => self.approve(&mut request).await,
        };
        match outcome {
            Ok(()) => {
                tracing::info!(request_id = %request.id, status = %request.status, "interchange decided");
                Ok(request)
            }
            Err(err) => {
                tracing::warn!(request_id = %request.id, code = err.code(), "interchange decision refused");
                Err(err)
            }
        }
    }

    async fn reject(&self, request: &mut ShiftInterchangeRequest) -> Result<(), GymError> {
        request.transition(Decision::Rejected)?;
        self.interchanges.record_rejection(request).await
    }

    async fn approve(&self, request: &mut ShiftInterchangeRequest) -> Result<(), GymError> {
        *request = self.interchanges.approve_with_swap(request).await?;
        Ok(())
    }

    async fn owned_shift(&self, id: ShiftId, owner: StaffMemberId) -> Result<Shift, GymError> {
        self.shifts
            .get_by_id(id)
            .await?
            .filter(|shift| shift.staff_member_id == owner)
            .ok_or_else(|| GymError::not_found("Shift", id))
    }
}
