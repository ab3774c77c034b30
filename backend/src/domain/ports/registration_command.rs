//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Raw registration form. Validation happens behind the port so every
/// failure can be reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub username: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create an account.
    ///
    /// Fails with `invalid_request` whose details hold
    /// `{errors: [{field, code, message}]}`, one entry per failed policy.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error>;
}

/// Accepts any request and invents an id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationCommand;

#[async_trait]
impl RegistrationCommand for FixtureRegistrationCommand {
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        Ok(RegisterResponse {
            user_id: UserId::random(),
            username: request.username,
        })
    }
}
