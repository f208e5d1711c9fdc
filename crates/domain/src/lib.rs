//! # gymdesk-domain
//!
//! Pure domain model for the gymdesk fitness-centre backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, weekdays
//! - Define **Users** (members, staff, managers, partners) and **Staff members**
//! - Define **Fitness centres** and their member roster
//! - Define **Shifts** (one per staff member and weekday)
//! - Define **Attendance** records and the policy that decides when a staff
//!   member may mark attendance
//! - Define **Shift interchange requests** and their `pending → approved | rejected`
//!   state machine
//! - Define the **Workout catalogue** of body parts and exercises
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod day;
pub mod error;
pub mod id;
pub mod time;

pub mod attendance;
pub mod fitness_centre;
pub mod interchange;
pub mod shift;
pub mod staff;
pub mod user;
pub mod workout;

/// Generate a short public code such as `gym_3fa9c1`.
///
/// The suffix is the first six hex characters of a fresh v4 UUID.
#[must_use]
pub(crate) fn short_code(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..6])
}
