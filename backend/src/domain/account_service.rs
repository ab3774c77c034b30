//! Registration and login against stored accounts.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, LOGIN_FAILED_MESSAGE, LoginService,
    RegisterRequest, RegisterResponse, RegistrationCommand,
};
use crate::domain::service_support::map_account_repository_error;
use crate::domain::{
    Account, Error, HashCost, LoginCredentials, PasswordHash, PasswordHashError, Registration,
    RegistrationIssue, UserId,
};

/// Password hashed on first login attempt for an unknown username.
const DECOY_PASSWORD: &str = "decoy password for unknown accounts";

fn registration_rejected(issues: &[RegistrationIssue]) -> Error {
    Error::invalid_request("registration failed").with_details(json!({ "errors": issues }))
}

fn duplicate_username() -> RegistrationIssue {
    RegistrationIssue::new(
        "username",
        "unique",
        "User with this username is already registered",
    )
}

fn duplicate_email() -> RegistrationIssue {
    RegistrationIssue::new("email", "unique", "User with this email is already registered")
}

fn hashing_failed(err: &PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {err}"))
}

/// Run CPU-bound hashing off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("password worker failed: {err}")))
}

/// Service implementing [`RegistrationCommand`] and [`LoginService`].
///
/// Unknown usernames are checked against a decoy hash so a failed login
/// costs the same whether or not the account exists.
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
    hash_cost: HashCost,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<A> AccountService<A> {
    pub fn new(accounts: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            clock,
            hash_cost: HashCost::default(),
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Override the argon2 cost for new hashes (tests use [`HashCost::MINIMAL`]).
    #[must_use]
    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    async fn derive_hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.hash_cost;
        run_blocking(move || PasswordHash::derive(&password, cost))
            .await?
            .map_err(|err| hashing_failed(&err))
    }

    async fn verify_hash(&self, hash: PasswordHash, candidate: &str) -> Result<bool, Error> {
        let candidate = Zeroizing::new(candidate.to_owned());
        run_blocking(move || hash.verify(&candidate)).await
    }

    async fn decoy_hash(&self) -> Result<PasswordHash, Error> {
        self.decoy
            .get_or_try_init(|| self.derive_hash(DECOY_PASSWORD))
            .await
            .cloned()
    }
}

impl<A> AccountService<A>
where
    A: AccountRepository,
{
    /// Username taken wins over email taken; only one of the two is reported.
    async fn uniqueness_issue(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<RegistrationIssue>, Error> {
        let by_username = self
            .accounts
            .find_by_username(username)
            .await
            .map_err(map_account_repository_error)?;
        if by_username.is_some() {
            return Ok(Some(duplicate_username()));
        }
        let by_email = self
            .accounts
            .find_by_email(email.trim())
            .await
            .map_err(map_account_repository_error)?;
        Ok(by_email.map(|_| duplicate_email()))
    }
}

#[async_trait]
impl<A> RegistrationCommand for AccountService<A>
where
    A: AccountRepository,
{
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, Error> {
        let RegisterRequest {
            username,
            email,
            password,
            password_confirmation,
        } = request;

        let mut issues = Vec::new();
        if let Some(issue) = self.uniqueness_issue(&username, &email).await? {
            issues.push(issue);
        }
        let registration =
            match Registration::try_from_parts(&username, &email, &password, &password_confirmation)
            {
                Ok(registration) if issues.is_empty() => registration,
                Ok(_) => return Err(registration_rejected(&issues)),
                Err(policy) => {
                    issues.extend(policy);
                    return Err(registration_rejected(&issues));
                }
            };

        let password_hash = self.derive_hash(registration.password()).await?;
        let account = Account {
            id: UserId::random(),
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
            created_at: self.clock.utc(),
        };
        match self.accounts.insert_account(&account).await {
            Ok(()) => {}
            Err(AccountRepositoryError::DuplicateUsername) => {
                return Err(registration_rejected(&[duplicate_username()]));
            }
            Err(AccountRepositoryError::DuplicateEmail) => {
                return Err(registration_rejected(&[duplicate_email()]));
            }
            Err(err) => return Err(map_account_repository_error(err)),
        }

        info!(user_id = %account.id, "account registered");
        Ok(RegisterResponse {
            user_id: account.id,
            username: account.username.as_str().to_owned(),
        })
    }
}

#[async_trait]
impl<A> LoginService for AccountService<A>
where
    A: AccountRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_account_repository_error)?;

        let Some(account) = account else {
            let decoy = self.decoy_hash().await?;
            self.verify_hash(decoy, credentials.password()).await?;
            return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
        };
        if self
            .verify_hash(account.password_hash.clone(), credentials.password())
            .await?
        {
            return Ok(account.id);
        }
        warn!(user_id = %account.id, "password mismatch");
        Err(Error::unauthorized(LOGIN_FAILED_MESSAGE))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
