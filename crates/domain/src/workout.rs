//! Workout catalogue — body parts and the exercises that train them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GymError, ValidationError};
use crate::id::{BodyPartId, ExerciseId};

const MAX_NAME_LEN: usize = 100;

/// Which half of the body a [`BodyPart`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPartType {
    Upper,
    Lower,
}

impl BodyPartType {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }
}

impl fmt::Display for BodyPartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPartType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Upper, Self::Lower]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "type",
                value: s.to_string(),
            })
    }
}

/// A trainable body part, such as `chest` or `calves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub id: BodyPartId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BodyPartType,
    /// Opaque reference to an illustration, if any.
    pub image_ref: Option<String>,
}

impl BodyPart {
    /// Create a body part without an illustration.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] when the name is empty or longer than
    /// 100 characters.
    pub fn new(name: impl Into<String>, kind: BodyPartType) -> Result<Self, GymError> {
        let part = Self {
            id: BodyPartId::new(),
            name: name.into(),
            kind,
            image_ref: None,
        };
        validate_name(&part.name)?;
        Ok(part)
    }
}

/// An exercise and the body parts it works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub description: String,
    /// Step-by-step instructions.
    pub explanation: String,
    pub body_part_ids: Vec<BodyPartId>,
}

impl Exercise {
    /// Create an exercise working `body_part_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::Validation`] when the name is empty or longer than
    /// 100 characters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        explanation: impl Into<String>,
        mut body_part_ids: Vec<BodyPartId>,
    ) -> Result<Self, GymError> {
        body_part_ids.sort();
        body_part_ids.dedup();
        let exercise = Self {
            id: ExerciseId::new(),
            name: name.into(),
            description: description.into(),
            explanation: explanation.into(),
            body_part_ids,
        };
        validate_name(&exercise.name)?;
        Ok(exercise)
    }

    /// Whether the exercise works `body_part`.
    #[must_use]
    pub fn trains(&self, body_part: BodyPartId) -> bool {
        self.body_part_ids.contains(&body_part)
    }
}

fn validate_name(name: &str) -> Result<(), GymError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
        }
        .into());
    }
    Ok(())
}
