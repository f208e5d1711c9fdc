//! JSON REST handlers for attendance.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gymdesk_domain::attendance::Attendance;

use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Ports};

/// Request body for marking attendance. Send `{}` when there is no photo.
#[derive(Deserialize)]
pub struct MarkAttendanceRequest {
    /// Reference to an uploaded photo, opaque to the server.
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<Attendance>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the mark endpoint.
pub enum MarkResponse {
    Created(Json<Attendance>),
}

impl IntoResponse for MarkResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `POST /api/attendance`
pub async fn mark<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
    JsonBody(req): JsonBody<MarkAttendanceRequest>,
) -> Result<MarkResponse, ApiError> {
    let attendance = state
        .attendance_service
        .mark_attendance(&caller, req.image_ref)
        .await?;
    Ok(MarkResponse::Created(Json(attendance)))
}

/// `GET /api/attendance`
pub async fn own<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
) -> Result<ListResponse, ApiError> {
    let history = state.attendance_service.own_attendance(&caller).await?;
    Ok(ListResponse::Ok(Json(history)))
}

/// `GET /api/staff/{employee_id}/attendance`
pub async fn for_staff<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    Path(employee_id): Path<String>,
) -> Result<ListResponse, ApiError> {
    let history = state
        .attendance_service
        .staff_attendance(&manager, &employee_id)
        .await?;
    Ok(ListResponse::Ok(Json(history)))
}
