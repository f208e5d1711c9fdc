//! Fitness centre — a gym registered and owned by a partner.

use serde::{Deserialize, Serialize};

use crate::error::{GymError, ValidationError};
use crate::id::{FitnessCentreId, UserId};
use crate::time::{Timestamp, now};

const MAX_PHONE_LEN: usize = 12;

/// A fitness centre and its public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessCentre {
    pub id: FitnessCentreId,
    /// Public code (`gym_xxxxxx`).
    pub code: String,
    pub owner_id: UserId,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub zip_code: Option<String>,
    pub description: Option<String>,
    pub created_on: Timestamp,
    pub updated_on: Timestamp,
}

impl FitnessCentre {
    /// Create a builder for constructing a [`FitnessCentre`].
    #[must_use]
    pub fn builder() -> FitnessCentreBuilder {
        FitnessCentreBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] when name, address or phone number is
    /// empty, or the phone number is longer than 12 characters.
    pub fn validate(&self) -> Result<(), GymError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "address" }.into());
        }
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "phone_number",
            }
            .into());
        }
        if self.phone_number.chars().count() > MAX_PHONE_LEN {
            return Err(ValidationError::TooLong {
                field: "phone_number",
                max: MAX_PHONE_LEN,
            }
            .into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`FitnessCentre`].
#[derive(Debug, Default)]
pub struct FitnessCentreBuilder {
    owner_id: Option<UserId>,
    name: Option<String>,
    address: Option<String>,
    phone_number: Option<String>,
    zip_code: Option<String>,
    description: Option<String>,
}

impl FitnessCentreBuilder {
    #[must_use]
    pub fn owner_id(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    #[must_use]
    pub fn zip_code(mut self, zip: Option<String>) -> Self {
        self.zip_code = zip;
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Consume the builder, validate, and return a [`FitnessCentre`] with a
    /// freshly generated code.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] if required fields are missing or invalid.
    pub fn build(self) -> Result<FitnessCentre, GymError> {
        let ts = now();
        let centre = FitnessCentre {
            id: FitnessCentreId::new(),
            code: crate::short_code("gym"),
            owner_id: self.owner_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            zip_code: self.zip_code,
            description: self.description,
            created_on: ts,
            updated_on: ts,
        };
        centre.validate()?;
        Ok(centre)
    }
}
