//! Error translation shared by the poll services.

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::polls::PollValidationError;
use crate::domain::ports::{
    AccountRepositoryError, CategoryRepositoryError, PollRepositoryError, VoteRepositoryError,
};

pub(crate) fn question_not_found(question_id: Uuid) -> Error {
    Error::not_found("question not found").with_details(json!({
        "questionId": question_id,
        "code": "question_not_found",
    }))
}

/// Single-field validation failure: details are `{field, code}`.
pub(crate) fn invalid_field(error: &PollValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

pub(crate) fn map_poll_repository_error(error: PollRepositoryError) -> Error {
    match error {
        PollRepositoryError::Connection { message } => {
            debug!(%message, "poll repository unavailable");
            Error::service_unavailable(format!("poll repository unavailable: {message}"))
        }
        PollRepositoryError::Query { message } => {
            Error::internal(format!("poll repository error: {message}"))
        }
        PollRepositoryError::CategoryNotFound { category_id } => {
            Error::not_found("category not found").with_details(json!({
                "categoryId": category_id,
                "code": "category_not_found",
            }))
        }
        PollRepositoryError::Conflict { message } => {
            Error::conflict(format!("question was not changed, please retry: {message}"))
        }
    }
}

pub(crate) fn map_vote_repository_error(error: VoteRepositoryError) -> Error {
    match error {
        VoteRepositoryError::Connection { message } => {
            debug!(%message, "vote repository unavailable");
            Error::service_unavailable(format!("vote repository unavailable: {message}"))
        }
        VoteRepositoryError::Query { message } => {
            Error::internal(format!("vote repository error: {message}"))
        }
        VoteRepositoryError::AlreadyVoted { question_id } => {
            Error::already_voted("you have already voted on this question").with_details(json!({
                "questionId": question_id,
                "code": "already_voted",
            }))
        }
        VoteRepositoryError::ChoiceNotFound { choice_id } => {
            Error::not_found("choice not found").with_details(json!({
                "choiceId": choice_id,
                "code": "choice_not_found",
            }))
        }
        VoteRepositoryError::Conflict { message } => {
            Error::conflict(format!("vote was not recorded, please retry: {message}"))
        }
    }
}

pub(crate) fn map_category_repository_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            debug!(%message, "category repository unavailable");
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("category {name} already exists")).with_details(json!({
                "field": "category_name",
                "code": "unique",
            }))
        }
    }
}

pub(crate) fn map_account_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            debug!(%message, "account repository unavailable");
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername => {
            Error::conflict("User with this username is already registered").with_details(json!({
                "field": "username",
                "code": "unique",
            }))
        }
        AccountRepositoryError::DuplicateEmail => {
            Error::conflict("User with this email is already registered").with_details(json!({
                "field": "email",
                "code": "unique",
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(PollRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(PollRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    #[case(PollRepositoryError::category_not_found(Uuid::nil()), ErrorCode::NotFound)]
    #[case(PollRepositoryError::conflict("deadlock detected"), ErrorCode::Conflict)]
    fn poll_errors_map_to_codes(#[case] error: PollRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_poll_repository_error(error).code(), code);
    }

    #[rstest]
    #[case(VoteRepositoryError::already_voted(Uuid::nil()), ErrorCode::AlreadyVoted)]
    #[case(VoteRepositoryError::choice_not_found(Uuid::nil()), ErrorCode::NotFound)]
    #[case(VoteRepositoryError::conflict("serialization"), ErrorCode::Conflict)]
    #[case(VoteRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    fn vote_errors_map_to_codes(#[case] error: VoteRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_vote_repository_error(error).code(), code);
    }

    #[rstest]
    fn invalid_field_carries_field_and_code() {
        let err = invalid_field(&PollValidationError::EmptyQuestionText);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "questionText", "code": "required"}))
        );
    }
}
