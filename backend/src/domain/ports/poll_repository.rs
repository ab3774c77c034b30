//! Port for storing polls (a question and its choices).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::polls::{Poll, Question, QuestionText};

use super::define_port_error;

define_port_error! {
    /// Errors raised by poll repository adapters.
    pub enum PollRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "poll repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "poll repository query failed: {message}",
        /// The referenced category does not exist.
        CategoryNotFound { category_id: Uuid } =>
            "category {category_id} does not exist",
        /// A concurrent transaction won; the caller may retry.
        Conflict { message: String } =>
            "poll repository conflict: {message}",
    }
}

/// Persistence for the poll aggregate.
///
/// Adapters must write a poll and its choices atomically, and delete a
/// poll's votes, choices and question in one unit of work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Store a new question with all of its choices.
    async fn insert_poll(&self, poll: &Poll) -> Result<(), PollRepositoryError>;

    /// Load a question with its choices in ballot order, published or not.
    async fn find_poll(&self, question_id: &Uuid) -> Result<Option<Poll>, PollRepositoryError>;

    /// Replace a question's text. Returns `false` when the question is gone.
    async fn update_question_text(
        &self,
        question_id: &Uuid,
        text: &QuestionText,
    ) -> Result<bool, PollRepositoryError>;

    /// Remove votes, choices and the question. Returns `false` when absent.
    async fn delete_poll(&self, question_id: &Uuid) -> Result<bool, PollRepositoryError>;

    /// Questions with `publish_at <= now`, newest first.
    async fn list_published(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError>;

    /// Published questions in the named category, newest first.
    async fn list_published_in_category(
        &self,
        category_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError>;
}

/// Fixture implementation for wiring without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollRepository;

#[async_trait]
impl PollRepository for FixturePollRepository {
    async fn insert_poll(&self, _poll: &Poll) -> Result<(), PollRepositoryError> {
        Ok(())
    }

    async fn find_poll(&self, _question_id: &Uuid) -> Result<Option<Poll>, PollRepositoryError> {
        Ok(None)
    }

    async fn update_question_text(
        &self,
        _question_id: &Uuid,
        _text: &QuestionText,
    ) -> Result<bool, PollRepositoryError> {
        Ok(false)
    }

    async fn delete_poll(&self, _question_id: &Uuid) -> Result<bool, PollRepositoryError> {
        Ok(false)
    }

    async fn list_published(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_published_in_category(
        &self,
        _category_name: &str,
        _now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        Ok(Vec::new())
    }
}
