//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod attendance;
#[allow(clippy::missing_errors_doc)]
pub mod centres;
#[allow(clippy::missing_errors_doc)]
pub mod interchanges;
#[allow(clippy::missing_errors_doc)]
pub mod shifts;
#[allow(clippy::missing_errors_doc)]
pub mod staff;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod workouts;

use std::str::FromStr;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};

use crate::error::ApiError;
use crate::state::{AppState, Ports};

/// Build the `/api` sub-router.
pub fn routes<P: Ports>() -> Router<AppState<P>> {
    Router::new()
        // Accounts
        .route("/users", post(users::register::<P>))
        .route("/users/phone-exists", get(users::phone_exists::<P>))
        .route("/me", get(users::me).patch(users::update_me::<P>))
        .route("/me/centres", get(users::joined_centres::<P>))
        // Staff management
        .route("/staff", get(staff::list::<P>).post(staff::add::<P>))
        .route("/staff/{employee_id}", patch(staff::update::<P>))
        .route(
            "/staff/{employee_id}/weekly-off",
            put(staff::assign_weekly_off::<P>),
        )
        .route(
            "/staff/{employee_id}/shifts",
            get(shifts::for_staff::<P>).put(shifts::assign::<P>),
        )
        .route(
            "/staff/{employee_id}/attendance",
            get(attendance::for_staff::<P>),
        )
        // Fitness centres
        .route("/centres", post(centres::register::<P>))
        .route("/centres/mine", get(centres::mine::<P>))
        .route(
            "/centres/mine/members",
            get(centres::members::<P>).post(centres::add_member::<P>),
        )
        .route(
            "/centres/mine/members/{user_id}",
            delete(centres::remove_member::<P>),
        )
        // Staff self-service
        .route("/shifts", get(shifts::own::<P>))
        .route(
            "/attendance",
            get(attendance::own::<P>).post(attendance::mark::<P>),
        )
        .route(
            "/interchanges",
            get(interchanges::list::<P>).post(interchanges::request::<P>),
        )
        .route(
            "/interchanges/{id}/status",
            put(interchanges::update_status::<P>),
        )
        // Workout catalogue
        .route("/body-parts", get(workouts::body_parts::<P>))
        .route(
            "/body-parts/{id}/exercises",
            get(workouts::exercises::<P>),
        )
}

/// Parse an identifier taken from the URL path.
fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::invalid_id(raw))
}
