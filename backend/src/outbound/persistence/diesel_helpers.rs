//! Shared helpers for Diesel repository implementations.
//!
//! Repositories classify a Diesel failure once with [`classify_diesel_error`]
//! and then translate the resulting [`DbFailure`] into their own port error,
//! matching constraint names from the migrations where a violation carries
//! domain meaning.

use tracing::{debug, warn};

use super::pool::PoolError;

/// Constraint names from `migrations/`.
pub(crate) mod constraints {
    pub const CATEGORY_NAME_UNIQUE: &str = "categories_category_name_key";
    pub const ACCOUNT_USERNAME_UNIQUE: &str = "accounts_username_key";
    pub const ACCOUNT_EMAIL_UNIQUE: &str = "accounts_email_key";
    pub const VOTE_PER_VOTER_UNIQUE: &str = "votes_question_id_voter_id_key";
    pub const VOTE_CHOICE_FK: &str = "votes_question_choice_fkey";
    pub const QUESTION_CATEGORY_FK: &str = "questions_category_id_fkey";
}

/// Storage-neutral view of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Serialization failure or deadlock; safe to retry.
    Conflict(String),
    /// Anything else.
    Query(String),
}

impl DbFailure {
    /// True when the failure is a unique violation on `name`.
    pub(crate) fn violates_unique(&self, name: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(c) } if c == name)
    }

    /// True when the failure is a foreign key violation on `name`.
    pub(crate) fn violates_foreign_key(&self, name: &str) -> bool {
        matches!(self, Self::ForeignKeyViolation { constraint: Some(c) } if c == name)
    }

    /// Fallback message for variants without a domain translation.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::Connection(message) | Self::Conflict(message) | Self::Query(message) => message,
            Self::UniqueViolation { constraint } => {
                format!("unique violation: {}", constraint.as_deref().unwrap_or("unknown"))
            }
            Self::ForeignKeyViolation { constraint } => {
                warn!(
                    constraint_name = ?constraint,
                    "unrecognised foreign key violation - may need specific error mapping"
                );
                format!(
                    "foreign key violation: {}",
                    constraint.as_deref().unwrap_or("unknown")
                )
            }
        }
    }
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    error.message().to_owned()
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DbFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    DbFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    DbFailure::Connection("database connection error".to_owned())
                }
                DatabaseErrorKind::SerializationFailure => {
                    DbFailure::Conflict("concurrent update, retry".to_owned())
                }
                // Diesel has no kind for SQLSTATE 40P01.
                DatabaseErrorKind::Unknown if is_deadlock(info.message()) => {
                    DbFailure::Conflict("deadlock detected, retry".to_owned())
                }
                _ => DbFailure::Query("database error".to_owned()),
            }
        }
        DieselError::BrokenTransactionManager => {
            DbFailure::Connection("transaction manager broken".to_owned())
        }
        _ => DbFailure::Query("database error".to_owned()),
    }
}

fn is_deadlock(message: &str) -> bool {
    message.contains("deadlock detected")
}

/// Convert a stored non-negative count to the domain tally type.
pub(crate) fn tally_from_db(votes: i32) -> u32 {
    u32::try_from(votes).unwrap_or_default()
}
