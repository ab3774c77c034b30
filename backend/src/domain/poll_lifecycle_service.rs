//! Poll lifecycle: create, edit and delete questions.
//!
//! Ownership is a plain comparison between the acting user and the question
//! owner. Non-owners asking about a question that is not yet published get
//! `not_found`, the same answer as for a missing question, so unpublished
//! questions stay invisible to everyone but their owner.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::polls::{Poll, PollDraft, QuestionText, parse_choice_entries};
use crate::domain::ports::{
    CategoryRepository, CreateQuestionRequest, CreateQuestionResponse, DeleteQuestionRequest,
    EditQuestionRequest, PollLifecycleCommand, PollRepository,
};
use crate::domain::service_support::{
    invalid_field, map_category_repository_error, map_poll_repository_error, question_not_found,
};
use crate::domain::{Error, UserId};

/// Service implementing [`PollLifecycleCommand`].
#[derive(Clone)]
pub struct PollLifecycleService<P, C> {
    polls: Arc<P>,
    categories: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<P, C> PollLifecycleService<P, C> {
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use polls::domain::PollLifecycleService;
    /// # use polls::domain::ports::{FixtureCategoryRepository, FixturePollRepository};
    /// let service = PollLifecycleService::new(
    ///     Arc::new(FixturePollRepository),
    ///     Arc::new(FixtureCategoryRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(polls: Arc<P>, categories: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            polls,
            categories,
            clock,
        }
    }
}

impl<P, C> PollLifecycleService<P, C>
where
    P: PollRepository,
    C: CategoryRepository,
{
    /// Load a poll the requester may mutate.
    async fn owned_poll(&self, requester: &UserId, question_id: Uuid) -> Result<Poll, Error> {
        let poll = self
            .polls
            .find_poll(&question_id)
            .await
            .map_err(map_poll_repository_error)?
            .ok_or_else(|| question_not_found(question_id))?;

        let question = poll.question();
        if question.is_owned_by(requester) {
            return Ok(poll);
        }
        if !question.is_published_at(self.clock.utc()) {
            return Err(question_not_found(question_id));
        }
        Err(
            Error::forbidden("only the owner may change this question").with_details(json!({
                "questionId": question_id,
                "code": "not_owner",
            })),
        )
    }
}

#[async_trait]
impl<P, C> PollLifecycleCommand for PollLifecycleService<P, C>
where
    P: PollRepository,
    C: CategoryRepository,
{
    async fn create_question(
        &self,
        request: CreateQuestionRequest,
    ) -> Result<CreateQuestionResponse, Error> {
        let CreateQuestionRequest {
            owner,
            category_id,
            text,
            choice_texts,
        } = request;
        let text = QuestionText::new(&text).map_err(|err| invalid_field(&err))?;
        let choice_texts = parse_choice_entries(&choice_texts).map_err(|err| invalid_field(&err))?;

        let category = self
            .categories
            .find_category(&category_id)
            .await
            .map_err(map_category_repository_error)?;
        if category.is_none() {
            return Err(Error::not_found("category not found").with_details(json!({
                "categoryId": category_id,
                "code": "category_not_found",
            })));
        }

        let poll = Poll::from_draft(PollDraft {
            category_id,
            owner,
            text,
            choice_texts,
            publish_at: self.clock.utc(),
        });
        self.polls
            .insert_poll(&poll)
            .await
            .map_err(map_poll_repository_error)?;

        let question_id = poll.question().id();
        info!(
            %question_id,
            %owner,
            choices = poll.choices().len(),
            "question created"
        );
        Ok(CreateQuestionResponse { question_id })
    }

    async fn edit_question(&self, request: EditQuestionRequest) -> Result<(), Error> {
        let EditQuestionRequest {
            requester,
            question_id,
            text,
        } = request;
        self.owned_poll(&requester, question_id).await?;
        let text = QuestionText::new(&text).map_err(|err| invalid_field(&err))?;

        let updated = self
            .polls
            .update_question_text(&question_id, &text)
            .await
            .map_err(map_poll_repository_error)?;
        if !updated {
            return Err(question_not_found(question_id));
        }
        info!(%question_id, "question text edited");
        Ok(())
    }

    async fn delete_question(&self, request: DeleteQuestionRequest) -> Result<(), Error> {
        let DeleteQuestionRequest {
            requester,
            question_id,
        } = request;
        self.owned_poll(&requester, question_id).await?;

        let deleted = self
            .polls
            .delete_poll(&question_id)
            .await
            .map_err(map_poll_repository_error)?;
        if !deleted {
            return Err(question_not_found(question_id));
        }
        info!(%question_id, "question deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "poll_lifecycle_service_tests.rs"]
mod tests;
