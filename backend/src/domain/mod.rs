//! Domain primitives, aggregates and services.
//!
//! Purpose: define the poll, vote, category and account types used by the
//! API and persistence layers, and the services that drive them through the
//! ports in [`ports`]. Types validate on construction so adapters never see
//! an invalid value.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserId / Username / EmailAddress / Account: account identity.
//! - polls: questions, choices, votes, categories and the view rules.
//! - services: one per driving port.

pub mod error;
pub mod polls;
pub mod ports;
pub mod user;

mod account_service;
mod auth;
mod category_service;
mod password;
mod poll_lifecycle_service;
mod poll_query_service;
mod service_support;
mod trace_id;
mod voting_service;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration, RegistrationIssue,
};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{HashCost, PasswordHash, PasswordHashError};
pub use self::poll_lifecycle_service::PollLifecycleService;
pub use self::poll_query_service::PollQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Account, EmailAddress, UserId, UserValidationError, Username};
pub use self::voting_service::VotingService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use polls::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
