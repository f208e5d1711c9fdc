//! JSON REST handlers for fitness centres and their rosters.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use gymdesk_domain::fitness_centre::FitnessCentre;
use gymdesk_domain::id::UserId;
use gymdesk_domain::user::User;

use crate::api::parse_id;
use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::{AppState, Ports};

/// Request body for registering a centre.
#[derive(Deserialize)]
pub struct RegisterCentreRequest {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub zip_code: Option<String>,
    pub description: Option<String>,
}

/// Request body for adding a member.
#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub user_id: UserId,
}

/// Possible responses from the centre endpoints.
pub enum CentreResponse {
    Created(Json<FitnessCentre>),
    Ok(Json<FitnessCentre>),
}

impl IntoResponse for CentreResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the roster endpoints; each returns the roster.
pub enum MembersResponse {
    Ok(Json<Vec<User>>),
}

impl IntoResponse for MembersResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/centres`
pub async fn register<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(owner): CurrentUser,
    JsonBody(req): JsonBody<RegisterCentreRequest>,
) -> Result<CentreResponse, ApiError> {
    let centre = FitnessCentre::builder()
        .owner_id(owner.id)
        .name(req.name)
        .address(req.address)
        .phone_number(req.phone_number)
        .zip_code(req.zip_code)
        .description(req.description)
        .build()?;
    let created = state
        .centre_service
        .register_centre(&owner, centre)
        .await?;
    Ok(CentreResponse::Created(Json(created)))
}

/// `GET /api/centres/mine`
pub async fn mine<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(owner): CurrentUser,
) -> Result<CentreResponse, ApiError> {
    let centre = state.centre_service.owned_centre(&owner).await?;
    Ok(CentreResponse::Ok(Json(centre)))
}

/// `GET /api/centres/mine/members`
pub async fn members<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(owner): CurrentUser,
) -> Result<MembersResponse, ApiError> {
    let members = state.centre_service.list_members(&owner).await?;
    Ok(MembersResponse::Ok(Json(members)))
}

/// `POST /api/centres/mine/members`
pub async fn add_member<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(owner): CurrentUser,
    JsonBody(req): JsonBody<AddMemberRequest>,
) -> Result<MembersResponse, ApiError> {
    let members = state
        .centre_service
        .add_member(&owner, req.user_id)
        .await?;
    Ok(MembersResponse::Ok(Json(members)))
}

/// `DELETE /api/centres/mine/members/{user_id}`
pub async fn remove_member<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(owner): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<MembersResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id)?;
    let members = state
        .centre_service
        .remove_member(&owner, user_id)
        .await?;
    Ok(MembersResponse::Ok(Json(members)))
}
