//! JSON REST handlers for shift interchange requests.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gymdesk_domain::id::{InterchangeRequestId, ShiftId};
use gymdesk_domain::interchange::{Decision, ShiftInterchangeRequest};

use crate::api::parse_id;
use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Ports};

/// Request body for asking a colleague to swap shifts.
#[derive(Deserialize)]
pub struct RequestInterchangeRequest {
    /// Email of the staff member being asked.
    pub target_email: String,
    /// One of the caller's shifts.
    pub requester_shift_id: ShiftId,
    /// One of the target's shifts, on the same day.
    pub target_shift_id: ShiftId,
}

/// Request body for deciding on a request.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Decision,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ShiftInterchangeRequest>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the request and status endpoints.
pub enum RequestResponse {
    Created(Json<ShiftInterchangeRequest>),
    Ok(Json<ShiftInterchangeRequest>),
}

impl IntoResponse for RequestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/interchanges`
pub async fn list<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
) -> Result<ListResponse, ApiError> {
    let requests = state.interchange_service.list_requests(&caller).await?;
    Ok(ListResponse::Ok(Json(requests)))
}

/// `POST /api/interchanges`
pub async fn request<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
    JsonBody(req): JsonBody<RequestInterchangeRequest>,
) -> Result<RequestResponse, ApiError> {
    let created = state
        .interchange_service
        .request_interchange(
            &caller,
            &req.target_email,
            req.requester_shift_id,
            req.target_shift_id,
        )
        .await?;
    Ok(RequestResponse::Created(Json(created)))
}

/// `PUT /api/interchanges/{id}/status`
pub async fn update_status<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> Result<RequestResponse, ApiError> {
    let id: InterchangeRequestId = parse_id(&id)?;
    let updated = state
        .interchange_service
        .update_status(&caller, id, req.status)
        .await?;
    Ok(RequestResponse::Ok(Json(updated)))
}
