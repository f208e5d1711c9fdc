//! Role and ownership checks shared by the services.

use gymdesk_domain::error::{GymError, PermissionError, RuleViolation};
use gymdesk_domain::staff::StaffMember;
use gymdesk_domain::user::{Role, User};

use crate::ports::StaffRepository;

pub(crate) fn require_role(user: &User, role: Role) -> Result<(), GymError> {
    if user.role == role {
        Ok(())
    } else {
        Err(PermissionError::RoleRequired(role.as_str()).into())
    }
}

/// Employment record of the calling staff user.
pub(crate) async fn own_staff_record<S: StaffRepository>(
    repo: &S,
    user: &User,
) -> Result<StaffMember, GymError> {
    require_role(user, Role::Staff)?;
    repo.find_by_user_id(user.id)
        .await?
        .ok_or_else(|| RuleViolation::NotStaffMember.into())
}

/// Employee `employee_id` of `manager`.
///
/// Employees of other managers are reported as not found.
pub(crate) async fn managed_staff<S: StaffRepository>(
    repo: &S,
    manager: &User,
    employee_id: &str,
) -> Result<StaffMember, GymError> {
    require_role(manager, Role::Manager)?;
    repo.find_by_employee_id(employee_id)
        .await?
        .filter(|staff| staff.reports_to(manager.id))
        .ok_or_else(|| GymError::not_found("StaffMember", employee_id))
}
