//! JSON REST handlers for a manager's staff.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gymdesk_domain::day::Day;
use gymdesk_domain::staff::{StaffMember, StaffMemberProfile};
use gymdesk_domain::user::User;

use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Ports};

/// Request body for enrolling a staff member.
#[derive(Deserialize)]
pub struct AddStaffRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Request body for renaming a staff member.
#[derive(Deserialize)]
pub struct UpdateStaffRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for assigning weekly offs.
#[derive(Deserialize)]
pub struct WeeklyOffRequest {
    pub days: Vec<Day>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<StaffMemberProfile>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the add and update endpoints.
pub enum ProfileResponse {
    Created(Json<StaffMemberProfile>),
    Ok(Json<StaffMemberProfile>),
}

impl IntoResponse for ProfileResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the weekly-off endpoint.
pub enum WeeklyOffResponse {
    Ok(Json<StaffMember>),
}

impl IntoResponse for WeeklyOffResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/staff`
pub async fn list<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
) -> Result<ListResponse, ApiError> {
    let staff = state.account_service.list_staff_members(&manager).await?;
    Ok(ListResponse::Ok(Json(staff)))
}

/// `POST /api/staff`
pub async fn add<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    JsonBody(req): JsonBody<AddStaffRequest>,
) -> Result<ProfileResponse, ApiError> {
    let mut builder = User::builder().first_name(req.first_name).email(req.email);
    if let Some(last_name) = req.last_name {
        builder = builder.last_name(last_name);
    }
    if let Some(phone_number) = req.phone_number {
        builder = builder.phone_number(phone_number);
    }

    let user = builder.build()?;
    let profile = state
        .account_service
        .add_staff_member(&manager, user)
        .await?;
    Ok(ProfileResponse::Created(Json(profile)))
}

/// `PATCH /api/staff/{employee_id}`
pub async fn update<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    Path(employee_id): Path<String>,
    JsonBody(req): JsonBody<UpdateStaffRequest>,
) -> Result<ProfileResponse, ApiError> {
    let profile = state
        .account_service
        .update_staff_member(&manager, &employee_id, req.first_name, req.last_name)
        .await?;
    Ok(ProfileResponse::Ok(Json(profile)))
}

/// `PUT /api/staff/{employee_id}/weekly-off`
pub async fn assign_weekly_off<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(manager): CurrentUser,
    Path(employee_id): Path<String>,
    JsonBody(req): JsonBody<WeeklyOffRequest>,
) -> Result<WeeklyOffResponse, ApiError> {
    let staff = state
        .shift_service
        .assign_weekly_off(&manager, &employee_id, req.days)
        .await?;
    Ok(WeeklyOffResponse::Ok(Json(staff)))
}
