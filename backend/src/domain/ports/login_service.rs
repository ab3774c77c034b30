//! Driving port for login.
//!
//! Inbound adapters call this to turn credentials into a [`UserId`] without
//! knowing where accounts live, so handler tests can swap in a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Message returned for any credential mismatch.
pub const LOGIN_FAILED_MESSAGE: &str = "Wrong username or password!";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Fixed-account authenticator for wiring without storage.
///
/// `pollster` / `password` authenticates as [`FixtureLoginService::USER_ID`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    pub const USER_ID: &'static str = "123e4567-e89b-12d3-a456-426614174000";
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == "pollster" && credentials.password() == "password" {
            UserId::new(Self::USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized(LOGIN_FAILED_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("pollster", "password", true)]
    #[case("pollster", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn fixture_accepts_only_its_account(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (should_succeed, result) {
            (true, Ok(id)) => assert_eq!(id.to_string(), FixtureLoginService::USER_ID),
            (false, Err(err)) => {
                assert_eq!(err.code(), ErrorCode::Unauthorized);
                assert_eq!(err.message(), LOGIN_FAILED_MESSAGE);
            }
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(id)) => panic!("expected failure, got success: {id}"),
        }
    }
}
