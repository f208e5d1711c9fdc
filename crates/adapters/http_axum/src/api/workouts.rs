//! JSON REST handlers for the workout catalogue.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gymdesk_domain::error::GymError;
use gymdesk_domain::id::BodyPartId;
use gymdesk_domain::workout::{BodyPart, BodyPartType, Exercise};

use crate::api::parse_id;
use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::state::{AppState, Ports};

/// Query string of the body part listing. `type` is `upper` or `lower`.
#[derive(Deserialize)]
pub struct BodyPartsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Possible responses from the body part listing.
pub enum BodyPartsResponse {
    Ok(Json<Vec<BodyPart>>),
}

impl IntoResponse for BodyPartsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the exercise listing.
pub enum ExercisesResponse {
    Ok(Json<Vec<Exercise>>),
}

impl IntoResponse for ExercisesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/body-parts?type=`
pub async fn body_parts<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(_caller): CurrentUser,
    QueryParams(query): QueryParams<BodyPartsQuery>,
) -> Result<BodyPartsResponse, ApiError> {
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<BodyPartType>)
        .transpose()
        .map_err(GymError::from)?;
    let parts = state.workout_service.body_parts(kind).await?;
    Ok(BodyPartsResponse::Ok(Json(parts)))
}

/// `GET /api/body-parts/{id}/exercises`
pub async fn exercises<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(_caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<ExercisesResponse, ApiError> {
    let id: BodyPartId = parse_id(&id)?;
    let exercises = state.workout_service.exercises_for(id).await?;
    Ok(ExercisesResponse::Ok(Json(exercises)))
}
