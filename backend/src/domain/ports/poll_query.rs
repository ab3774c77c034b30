//! Driving port for the read model: listings, categories and single-poll
//! displays.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::polls::{Category, Poll, PollDisplay, Question};
use crate::domain::{Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollQuery: Send + Sync {
    /// Published questions, newest first.
    async fn list_published_questions(&self) -> Result<Vec<Question>, Error>;

    /// A published poll. Unpublished and missing questions are both
    /// `not_found`, whoever asks.
    async fn get_published_question(&self, question_id: Uuid) -> Result<Poll, Error>;

    /// Categories, newest first.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Published questions in a category, newest first. An unknown name
    /// yields an empty list.
    async fn list_questions_in_category(&self, category_name: String)
    -> Result<Vec<Question>, Error>;

    /// A published poll with the ballot/results view resolved for `viewer`.
    async fn view_poll(
        &self,
        question_id: Uuid,
        viewer: Option<UserId>,
    ) -> Result<PollDisplay, Error>;
}

/// Empty read model.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollQuery;

#[async_trait]
impl PollQuery for FixturePollQuery {
    async fn list_published_questions(&self) -> Result<Vec<Question>, Error> {
        Ok(Vec::new())
    }

    async fn get_published_question(&self, _question_id: Uuid) -> Result<Poll, Error> {
        Err(Error::not_found("question not found"))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }

    async fn list_questions_in_category(
        &self,
        _category_name: String,
    ) -> Result<Vec<Question>, Error> {
        Ok(Vec::new())
    }

    async fn view_poll(
        &self,
        _question_id: Uuid,
        _viewer: Option<UserId>,
    ) -> Result<PollDisplay, Error> {
        Err(Error::not_found("question not found"))
    }
}
