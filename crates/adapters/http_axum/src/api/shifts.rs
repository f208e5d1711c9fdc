//! JSON REST handlers for shifts.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::NaiveTime;
use serde::Deserialize;

use gymdesk_domain::day::Day;
use gymdesk_domain::shift::Shift;
use gymdesk_domain::time::hhmm;

use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Ports};

/// Request body for assigning a shift. Hours are `"HH:MM"`.
#[derive(Deserialize)]
pub struct AssignShiftRequest {
    pub day: Day,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<Shift>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the assign endpoint.
pub enum AssignResponse {
    Ok(Json<Shift>),
}

impl IntoResponse for AssignResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/shifts`
pub async fn own<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
) -> Result<ListResponse, ApiError> {
    let shifts = state.shift_service.own_shifts(&caller).await?;
    Ok(ListResponse::Ok(Json(shifts)))
}

/// `GET /api/staff/{employee_id}/shifts`
pub async fn for_staff<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    Path(employee_id): Path<String>,
) -> Result<ListResponse, ApiError> {
    let shifts = state
        .shift_service
        .staff_shifts(&manager, &employee_id)
        .await?;
    Ok(ListResponse::Ok(Json(shifts)))
}

/// `PUT /api/staff/{employee_id}/shifts`
///
/// Creates the shift for that day, or replaces its hours.
pub async fn assign<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    Path(employee_id): Path<String>,
    JsonBody(req): JsonBody<AssignShiftRequest>,
) -> Result<AssignResponse, ApiError> {
    let shift = state
        .shift_service
        .assign_shift(&manager, &employee_id, req.day, req.start, req.end)
        .await?;
    Ok(AssignResponse::Ok(Json(shift)))
}
