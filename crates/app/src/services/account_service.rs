//! Account service — registration, profiles and staff enrolment.

use chrono::NaiveDate;
use gymdesk_domain::error::{ConflictError, GymError};
use gymdesk_domain::id::UserId;
use gymdesk_domain::staff::{StaffMember, StaffMemberProfile};
use gymdesk_domain::user::{Role, User};

use crate::ports::{StaffRepository, UserRepository};
use crate::services::access::{managed_staff, require_role};

/// Profile fields a user may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl ProfileUpdate {
    fn apply(self, user: &mut User) {
        if let Some(value) = self.first_name {
            user.first_name = value;
        }
        if let Some(value) = self.last_name {
            user.last_name = Some(value);
        }
        if let Some(value) = self.phone_number {
            user.phone_number = Some(value);
        }
        if let Some(value) = self.date_of_birth {
            user.date_of_birth = Some(value);
        }
        if let Some(value) = self.address_line {
            user.address_line = Some(value);
        }
        if let Some(value) = self.zip_code {
            user.zip_code = Some(value);
        }
        if let Some(value) = self.weight {
            user.weight = Some(value);
        }
        if let Some(value) = self.height {
            user.height = Some(value);
        }
    }
}

/// Application service for user accounts and staff records.
pub struct AccountService<U, S> {
    users: U,
    staff: S,
}

impl<U: UserRepository, S: StaffRepository> AccountService<U, S> {
    /// Create a new service backed by the given repositories.
    pub fn new(users: U, staff: S) -> Self {
        Self { users, staff }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] if invariants fail,
    /// [`ConflictError::EmailAlreadyExists`] when the email is taken, or a
    /// storage error.
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register_user(&self, user: User) -> Result<User, GymError> {
        user.validate()?;
        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(ConflictError::EmailAlreadyExists.into());
        }
        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when no user with `id` exists, or a
    /// storage error.
    pub async fn get_user(&self, id: UserId) -> Result<User, GymError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| GymError::not_found("User", id))
    }

    /// Apply `update` to the caller's own profile.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] if the result breaks an invariant, or
    /// a storage error.
    #[tracing::instrument(skip(self, caller, update), fields(user_id = %caller.id))]
    pub async fn update_profile(
        &self,
        caller: &User,
        update: ProfileUpdate,
    ) -> Result<User, GymError> {
        let mut user = self.get_user(caller.id).await?;
        update.apply(&mut user);
        user.validate()?;
        self.users.update(user).await
    }

    /// Whether any account uses `phone_number`.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn phone_number_exists(&self, phone_number: &str) -> Result<bool, GymError> {
        Ok(self.users.find_by_phone(phone_number).await?.is_some())
    }

    /// Enrol `user` as staff reporting to `manager`.
    ///
    /// The account is forced to the staff role and gets a fresh employee id.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::Validation`] for an invalid profile,
    /// [`ConflictError::EmailAlreadyExists`] when the email is taken, or a
    /// storage error.
    #[tracing::instrument(skip(self, manager, user), fields(manager_id = %manager.id))]
    pub async fn add_staff_member(
        &self,
        manager: &User,
        mut user: User,
    ) -> Result<StaffMemberProfile, GymError> {
        require_role(manager, Role::Manager)?;
        user.role = Role::Staff;
        user.is_partner = false;
        user.validate()?;
        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(ConflictError::EmailAlreadyExists.into());
        }
        let staff = StaffMember::new(user.id, manager.id);
        let profile = self.staff.enroll(user, staff).await?;
        tracing::info!(employee_id = %profile.staff.employee_id, "staff member enrolled");
        Ok(profile)
    }

    /// List the staff reporting to `manager`.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager, or a
    /// storage error.
    pub async fn list_staff_members(
        &self,
        manager: &User,
    ) -> Result<Vec<StaffMemberProfile>, GymError> {
        require_role(manager, Role::Manager)?;
        self.staff.list_by_manager(manager.id).await
    }

    /// Rename one of `manager`'s employees.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Permission`] unless `manager` is a manager,
    /// [`GymError::NotFound`] when the employee does not report to them,
    /// [`GymError::Validation`] for invalid names, or a storage error.
    #[tracing::instrument(skip(self, manager, first_name, last_name), fields(manager_id = %manager.id))]
    pub async fn update_staff_member(
        &self,
        manager: &User,
        employee_id: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<StaffMemberProfile, GymError> {
        let staff = managed_staff(&self.staff, manager, employee_id).await?;
        let mut user = self.get_user(staff.user_id).await?;
        ProfileUpdate {
            first_name,
            last_name,
            ..ProfileUpdate::default()
        }
        .apply(&mut user);
        user.validate()?;
        let user = self.users.update(user).await?;
        Ok(StaffMemberProfile { staff, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use gymdesk_domain::error::{PermissionError, ValidationError};

    fn make_service() -> (AccountService<InMemoryStore, InMemoryStore>, InMemoryStore) {
        let store = InMemoryStore::default();
        (AccountService::new(store.clone(), store.clone()), store)
    }

    fn new_user(email: &str) -> User {
        User::builder()
            .first_name("Ravi")
            .email(email)
            .phone_number("9876543210")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_register_user_when_valid() {
        let (svc, _) = make_service();
        let user = new_user("ravi@gym.test");
        let id = user.id;

        let created = svc.register_user(user).await.unwrap();
        assert_eq!(created.role, Role::Member);

        let fetched = svc.get_user(id).await.unwrap();
        assert_eq!(fetched.email, "ravi@gym.test");
    }

    #[tokio::test]
    async fn should_reject_duplicate_email() {
        let (svc, _) = make_service();
        svc.register_user(new_user("ravi@gym.test")).await.unwrap();

        let result = svc.register_user(new_user("ravi@gym.test")).await;
        assert!(matches!(
            result,
            Err(GymError::Conflict(ConflictError::EmailAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_user_missing() {
        let (svc, _) = make_service();
        let result = svc.get_user(UserId::new()).await;
        assert!(matches!(result, Err(GymError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_report_phone_number_existence() {
        let (svc, _) = make_service();
        svc.register_user(new_user("ravi@gym.test")).await.unwrap();

        assert!(svc.phone_number_exists("9876543210").await.unwrap());
        assert!(!svc.phone_number_exists("0000000000").await.unwrap());
    }

    #[tokio::test]
    async fn should_update_own_profile() {
        let (svc, _) = make_service();
        let user = svc.register_user(new_user("ravi@gym.test")).await.unwrap();

        let updated = svc
            .update_profile(
                &user,
                ProfileUpdate {
                    last_name: Some("Kumar".to_string()),
                    weight: Some(72.5),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name(), "Ravi Kumar");
        assert_eq!(updated.weight, Some(72.5));
        assert_eq!(svc.get_user(user.id).await.unwrap().weight, Some(72.5));
    }

    #[tokio::test]
    async fn should_reject_invalid_profile_update() {
        let (svc, _) = make_service();
        let user = svc.register_user(new_user("ravi@gym.test")).await.unwrap();

        let result = svc
            .update_profile(
                &user,
                ProfileUpdate {
                    height: Some(-1.0),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(GymError::Validation(ValidationError::NotPositive { .. }))
        ));
    }

    #[tokio::test]
    async fn should_enrol_staff_member_for_manager() {
        let (svc, store) = make_service();
        let manager = store.seed_user("Meera", Role::Manager, false);

        let profile = svc
            .add_staff_member(&manager, new_user("ravi@gym.test"))
            .await
            .unwrap();

        assert_eq!(profile.user.role, Role::Staff);
        assert!(profile.staff.reports_to(manager.id));
        assert!(profile.staff.employee_id.starts_with("emp_"));

        let listed = svc.list_staff_members(&manager).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user.email, "ravi@gym.test");
    }

    #[tokio::test]
    async fn should_refuse_staff_enrolment_by_non_manager() {
        let (svc, store) = make_service();
        let member = store.seed_user("Arjun", Role::Member, false);

        let result = svc.add_staff_member(&member, new_user("ravi@gym.test")).await;
        assert!(matches!(
            result,
            Err(GymError::Permission(PermissionError::RoleRequired("manager")))
        ));
    }

    #[tokio::test]
    async fn should_only_list_own_staff() {
        let (svc, store) = make_service();
        let manager = store.seed_user("Meera", Role::Manager, false);
        let other = store.seed_user("Kabir", Role::Manager, false);
        store.seed_staff("Ravi", &manager);
        store.seed_staff("Sana", &other);

        let listed = svc.list_staff_members(&manager).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user.first_name, "Ravi");
    }

    #[tokio::test]
    async fn should_rename_own_staff_member() {
        let (svc, store) = make_service();
        let manager = store.seed_user("Meera", Role::Manager, false);
        let (_, staff) = store.seed_staff("Ravi", &manager);

        let profile = svc
            .update_staff_member(
                &manager,
                &staff.employee_id,
                Some("Ravindra".to_string()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(profile.user.first_name, "Ravindra");
    }

    #[tokio::test]
    async fn should_hide_staff_of_other_managers() {
        let (svc, store) = make_service();
        let manager = store.seed_user("Meera", Role::Manager, false);
        let other = store.seed_user("Kabir", Role::Manager, false);
        let (_, staff) = store.seed_staff("Sana", &other);

        let result = svc
            .update_staff_member(&manager, &staff.employee_id, Some("X".to_string()), None)
            .await;
        assert!(matches!(result, Err(GymError::NotFound(_))));
    }
}
