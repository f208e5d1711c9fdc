//! User — an account known to the backend.
//!
//! Credentials live with the external identity provider; this record only
//! holds the profile and the role used for authorization decisions.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GymError, ValidationError};
use crate::id::UserId;
use crate::time::{Timestamp, now};

/// Maximum length of first and last names.
pub const MAX_NAME_LEN: usize = 20;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Staff,
    Manager,
}

impl Role {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Staff => "staff",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "staff" => Ok(Self::Staff),
            "manager" => Ok(Self::Manager),
            other => Err(ValidationError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub role: Role,
    /// Partners may register and own a fitness centre.
    pub is_partner: bool,
    pub created_at: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] when the first name is empty, a name
    /// exceeds [`MAX_NAME_LEN`], the email is malformed, or a body
    /// measurement is not positive.
    pub fn validate(&self) -> Result<(), GymError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.first_name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "first_name",
                max: MAX_NAME_LEN,
            }
            .into());
        }
        if self
            .last_name
            .as_ref()
            .is_some_and(|name| name.chars().count() > MAX_NAME_LEN)
        {
            return Err(ValidationError::TooLong {
                field: "last_name",
                max: MAX_NAME_LEN,
            }
            .into());
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if self.weight.is_some_and(|w| w <= 0.0) {
            return Err(ValidationError::NotPositive { field: "weight" }.into());
        }
        if self.height.is_some_and(|h| h <= 0.0) {
            return Err(ValidationError::NotPositive { field: "height" }.into());
        }
        Ok(())
    }

    /// Display name (`first last`).
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    role: Option<Role>,
    is_partner: bool,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn partner(mut self, is_partner: bool) -> Self {
        self.is_partner = is_partner;
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] if required fields are missing or invalid.
    pub fn build(self) -> Result<User, GymError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name,
            email: self.email.unwrap_or_default(),
            phone_number: self.phone_number,
            date_of_birth: None,
            address_line: None,
            zip_code: None,
            weight: None,
            height: None,
            role: self.role.unwrap_or_default(),
            is_partner: self.is_partner,
            created_at: now(),
        };
        user.validate()?;
        Ok(user)
    }
}
