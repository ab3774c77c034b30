//! Port for registered accounts.

use async_trait::async_trait;

use crate::domain::Account;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Username is already taken.
        DuplicateUsername => "username is already registered",
        /// Email address is already taken.
        DuplicateEmail => "email is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;

    /// Store a new account. Username and email must both be unused.
    async fn insert_account(&self, account: &Account) -> Result<(), AccountRepositoryError>;
}

/// Fixture implementation for wiring without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn find_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }

    async fn insert_account(&self, _account: &Account) -> Result<(), AccountRepositoryError> {
        Ok(())
    }
}
