//! Workout service — browsing body parts and their exercises.

use gymdesk_domain::error::GymError;
use gymdesk_domain::id::BodyPartId;
use gymdesk_domain::workout::{BodyPart, BodyPartType, Exercise};

use crate::ports::WorkoutRepository;

/// Application service for the workout catalogue.
pub struct WorkoutService<W> {
    workouts: W,
}

impl<W: WorkoutRepository> WorkoutService<W> {
    /// Create a new service backed by the given repository.
    pub fn new(workouts: W) -> Self {
        Self { workouts }
    }

    /// Body parts of `kind`, or all of them.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn body_parts(
        &self,
        kind: Option<BodyPartType>,
    ) -> Result<Vec<BodyPart>, GymError> {
        self.workouts.list_body_parts(kind).await
    }

    /// Exercises working the body part `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GymError::NotFound`] for an unknown body part, or a storage
    /// error.
    pub async fn exercises_for(&self, id: BodyPartId) -> Result<Vec<Exercise>, GymError> {
        if self.workouts.get_body_part(id).await?.is_none() {
            return Err(GymError::not_found("BodyPart", id));
        }
        self.workouts.list_exercises_for(id).await
    }
}
