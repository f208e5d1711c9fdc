//! # gymdesk-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON REST API** under `/api` (accounts, staff, centres,
//!   shifts, attendance, interchange requests, workout catalogue) and
//!   `/health`
//! - Identify the caller from the `x-user-id` header set by the upstream
//!   identity gateway
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map [`GymError`](gymdesk_domain::error::GymError) into status codes and
//!   `{"error", "code"}` bodies, including rejected bodies and query strings
//!
//! ## Dependency rule
//! Depends on `gymdesk-app` (for port traits and services) and `gymdesk-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod caller;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
