//! # gymdesk-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `StaffRepository`, `FitnessCentreRepository`
//!   - `ShiftRepository`, `AttendanceRepository`
//!   - `InterchangeRepository` — including the atomic approve-and-swap
//!   - `WorkoutRepository` — read-only body part and exercise catalogue
//!   - `Clock` — wall-clock source, swappable in tests
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AccountService` — registration, profiles, staff enrolment
//!   - `CentreService` — centre registration and member roster
//!   - `ShiftService` — shift and weekly-off assignment
//!   - `AttendanceService` — attendance marking under the attendance policy
//!   - `InterchangeService` — shift swap requests and decisions
//!   - `WorkoutService` — browsing the exercise catalogue
//! - Enforce role and ownership checks before touching storage
//!
//! ## Dependency rule
//! Depends on `gymdesk-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
