//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, EmailAddress, PasswordHash, UserId, Username};

use super::diesel_helpers::{DbFailure, classify_diesel_error, constraints, pool_error_message};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_by(&self, key: Lookup<'_>) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = accounts::table.select(AccountRow::as_select()).into_boxed();
        let query = match key {
            Lookup::Username(username) => query.filter(accounts::username.eq(username)),
            Lookup::Email(email) => query.filter(accounts::email.eq(email)),
        };
        let row: Option<AccountRow> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(account_from_row).transpose()
    }
}

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Username(&'a str),
    Email(&'a str),
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    AccountRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    match classify_diesel_error(error) {
        DbFailure::Connection(message) => AccountRepositoryError::connection(message),
        failure if failure.violates_unique(constraints::ACCOUNT_USERNAME_UNIQUE) => {
            AccountRepositoryError::duplicate_username()
        }
        failure if failure.violates_unique(constraints::ACCOUNT_EMAIL_UNIQUE) => {
            AccountRepositoryError::duplicate_email()
        }
        failure => AccountRepositoryError::query(failure.into_message()),
    }
}

fn account_from_row(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let password_hash = PasswordHash::from_stored(&row.password_hash).map_err(|err| {
        AccountRepositoryError::query(format!("stored account {} is invalid: {err}", row.id))
    })?;
    Ok(Account {
        id: UserId::from_uuid(row.id),
        username: Username::from_stored(row.username),
        email: EmailAddress::from_stored(row.email),
        password_hash,
        created_at: row.created_at,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        self.find_by(Lookup::Username(username)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        self.find_by(Lookup::Email(email)).await
    }

    async fn insert_account(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let stored_hash = account.password_hash.to_stored();
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            username: account.username.as_str(),
            email: account.email.as_str(),
            password_hash: &stored_hash,
            created_at: account.created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
