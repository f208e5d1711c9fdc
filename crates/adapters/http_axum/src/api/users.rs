//! JSON REST handlers for accounts and the caller's own profile.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gymdesk_app::services::account_service::ProfileUpdate;
use gymdesk_domain::fitness_centre::FitnessCentre;
use gymdesk_domain::user::{Role, User};

use crate::caller::CurrentUser;
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::{AppState, Ports};

/// Request body for registering an account.
#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_partner: bool,
}

/// Request body for `PATCH /api/me`. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line: Option<String>,
    pub zip_code: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
            address_line: req.address_line,
            zip_code: req.zip_code,
            weight: req.weight,
            height: req.height,
        }
    }
}

/// Query string of the phone lookup.
#[derive(Deserialize)]
pub struct PhoneQuery {
    pub phone_number: String,
}

/// Body of the phone lookup response.
#[derive(Serialize)]
pub struct PhoneExists {
    pub exists: bool,
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<User>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the profile endpoints.
pub enum ProfileResponse {
    Ok(Json<User>),
}

impl IntoResponse for ProfileResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the phone lookup endpoint.
pub enum PhoneExistsResponse {
    Ok(Json<PhoneExists>),
}

impl IntoResponse for PhoneExistsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the joined centres endpoint.
pub enum CentresResponse {
    Ok(Json<Vec<FitnessCentre>>),
}

impl IntoResponse for CentresResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/users`
pub async fn register<P: Ports>(
    State(state): State<AppState<P>>,
    JsonBody(req): JsonBody<RegisterUserRequest>,
) -> Result<RegisterResponse, ApiError> {
    let mut builder = User::builder()
        .first_name(req.first_name)
        .email(req.email)
        .role(req.role)
        .partner(req.is_partner);
    if let Some(last_name) = req.last_name {
        builder = builder.last_name(last_name);
    }
    if let Some(phone_number) = req.phone_number {
        builder = builder.phone_number(phone_number);
    }

    let user = builder.build()?;
    let created = state.account_service.register_user(user).await?;
    Ok(RegisterResponse::Created(Json(created)))
}

/// `GET /api/users/phone-exists?phone_number=`
pub async fn phone_exists<P: Ports>(
    State(state): State<AppState<P>>,
    QueryParams(query): QueryParams<PhoneQuery>,
) -> Result<PhoneExistsResponse, ApiError> {
    let exists = state
        .account_service
        .phone_number_exists(&query.phone_number)
        .await?;
    Ok(PhoneExistsResponse::Ok(Json(PhoneExists { exists })))
}

/// `GET /api/me`
pub async fn me(CurrentUser(user): CurrentUser) -> ProfileResponse {
    ProfileResponse::Ok(Json(user))
}

/// `PATCH /api/me`
pub async fn update_me<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<ProfileResponse, ApiError> {
    let user = state
        .account_service
        .update_profile(&caller, req.into())
        .await?;
    Ok(ProfileResponse::Ok(Json(user)))
}

/// `GET /api/me/centres`
pub async fn joined_centres<P: Ports>(
    State(state): State<AppState<P>>,
    CurrentUser(caller): CurrentUser,
) -> Result<CentresResponse, ApiError> {
    let centres = state.centre_service.joined_centres(&caller).await?;
    Ok(CentresResponse::Ok(Json(centres)))
}
