//! Caller identification.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user's id in the [`USER_ID_HEADER`] header. Handlers that need a caller take
//! a [`CurrentUser`] argument.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gymdesk_domain::error::GymError;
use gymdesk_domain::id::UserId;
use gymdesk_domain::user::User;

use crate::error::ApiError;
use crate::state::{AppState, Ports};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf the request is made.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<P: Ports> FromRequestParts<AppState<P>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<P>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::Unauthenticated("missing x-user-id header"))?
            .to_str()
            .map_err(|_| ApiError::Unauthenticated("malformed x-user-id header"))?;
        let id = UserId::from_str(raw.trim())
            .map_err(|_| ApiError::Unauthenticated("malformed x-user-id header"))?;

        match state.account_service.get_user(id).await {
            Ok(user) => Ok(Self(user)),
            Err(GymError::NotFound(_)) => {
                tracing::debug!(user_id = %id, "request from unknown user");
                Err(ApiError::Unauthenticated("unknown user"))
            }
            Err(err) => Err(err.into()),
        }
    }
}
