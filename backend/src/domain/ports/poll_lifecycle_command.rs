//! Driving port for creating, editing and deleting polls.
//!
//! Every request names the acting user explicitly; there is no ambient
//! "current user".

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Request to create a question with its choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQuestionRequest {
    pub owner: UserId,
    pub category_id: Uuid,
    pub text: String,
    /// Submitted entries in order; blank ones are skipped.
    pub choice_texts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateQuestionResponse {
    pub question_id: Uuid,
}

/// Request to replace a question's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditQuestionRequest {
    pub requester: UserId,
    pub question_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteQuestionRequest {
    pub requester: UserId,
    pub question_id: Uuid,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollLifecycleCommand: Send + Sync {
    /// Create a question published immediately, owned by `owner`.
    async fn create_question(
        &self,
        request: CreateQuestionRequest,
    ) -> Result<CreateQuestionResponse, Error>;

    /// Owner-only text edit. `not_found` for unknown ids, `forbidden` for
    /// anyone else.
    async fn edit_question(&self, request: EditQuestionRequest) -> Result<(), Error>;

    /// Owner-only delete, removing choices and votes too.
    async fn delete_question(&self, request: DeleteQuestionRequest) -> Result<(), Error>;
}

/// Accepts creations and reports every other question as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollLifecycleCommand;

#[async_trait]
impl PollLifecycleCommand for FixturePollLifecycleCommand {
    async fn create_question(
        &self,
        _request: CreateQuestionRequest,
    ) -> Result<CreateQuestionResponse, Error> {
        Ok(CreateQuestionResponse {
            question_id: Uuid::new_v4(),
        })
    }

    async fn edit_question(&self, _request: EditQuestionRequest) -> Result<(), Error> {
        Err(Error::not_found("question not found"))
    }

    async fn delete_question(&self, _request: DeleteQuestionRequest) -> Result<(), Error> {
        Err(Error::not_found("question not found"))
    }
}
