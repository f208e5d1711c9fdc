//! Centre service — fitness centre registration and member roster.

use gymdesk_domain::error::{ConflictError, GymError, PermissionError};
use gymdesk_domain::fitness_centre::FitnessCentre;
use gymdesk_domain::id::UserId;
use gymdesk_domain::user::User;

use crate::ports::{FitnessCentreRepository, UserRepository};

/// Application service for fitness centres.
pub struct CentreService<C, U> {
    centres: C,
    users: U,
}

impl<C: FitnessCentreRepository, U: UserRepository> CentreService<C, U> {
    /// Create a new service backed by the given repositories.
    pub fn new(centres: C, users: U) -> Self {
        Self { centres, users }
    }

    /// Register `centre` on behalf of `owner`, who becomes its owner.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::PartnerRequired`] unless `owner` is a
    /// partner, [`ConflictError::CentreAlreadyRegistered`] when they already
    /// own a centre, [`GymError::Validation`] for an invalid centre, or a
    /// storage error.
    #[tracing::instrument(skip(self, owner, centre), fields(owner_id = %owner.id))]
    pub async fn register_centre(
        &self,
        owner: &User,
        mut centre: FitnessCentre,
    ) -> Result<FitnessCentre, GymError> {
        if !owner.is_partner {
            return Err(PermissionError::PartnerRequired.into());
        }
        centre.owner_id = owner.id;
        centre.validate()?;
        if self.centres.find_by_owner(owner.id).await?.is_some() {
            return Err(ConflictError::CentreAlreadyRegistered.into());
        }
        let centre = self.centres.create(centre).await?;
        tracing::info!(code = %centre.code, "fitness centre registered");
        Ok(centre)
    }

    /// The centre owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when `owner` owns no centre, or a
    /// storage error.
    pub async fn owned_centre(&self, owner: &User) -> Result<FitnessCentre, GymError> {
        self.centres
            .find_by_owner(owner.id)
            .await?
            .ok_or_else(|| GymError::not_found("FitnessCentre", format!("owner {}", owner.id)))
    }

    /// Add `user_id` to the roster of `owner`'s centre and return the roster.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when `owner` owns no centre or the user
    /// does not exist, or a storage error.
    #[tracing::instrument(skip(self, owner), fields(owner_id = %owner.id))]
    pub async fn add_member(&self, owner: &User, user_id: UserId) -> Result<Vec<User>, GymError> {
        let centre = self.owned_centre(owner).await?;
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(GymError::not_found("User", user_id));
        }
        self.centres.add_member(centre.id, user_id).await?;
        self.centres.list_members(centre.id).await
    }

    /// Remove `user_id` from the roster of `owner`'s centre and return the
    /// roster.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when `owner` owns no centre or the user
    /// is not a member, or a storage error.
    #[tracing::instrument(skip(self, owner), fields(owner_id = %owner.id))]
    pub async fn remove_member(
        &self,
        owner: &User,
        user_id: UserId,
    ) -> Result<Vec<User>, GymError> {
        let centre = self.owned_centre(owner).await?;
        if !self.centres.remove_member(centre.id, user_id).await? {
            return Err(GymError::not_found("Member", user_id));
        }
        self.centres.list_members(centre.id).await
    }

    /// Members of `owner`'s centre.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] when `owner` owns no centre, or a
    /// storage error.
    pub async fn list_members(&self, owner: &User) -> Result<Vec<User>, GymError> {
        let centre = self.owned_centre(owner).await?;
        self.centres.list_members(centre.id).await
    }

    /// Centres `user` has joined.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn joined_centres(&self, user: &User) -> Result<Vec<FitnessCentre>, GymError> {
        self.centres.list_joined(user.id).await
    }
}
