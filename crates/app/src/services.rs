//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//!
//! Services receive the already-identified caller as a [`User`] and apply the
//! role and ownership checks themselves.
//!
//! [`User`]: gymdesk_domain::user::User

mod access;

pub mod account_service;
pub mod attendance_service;
pub mod centre_service;
pub mod interchange_service;
pub mod shift_service;
pub mod workout_service;
