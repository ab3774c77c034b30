//! Read model: published listings, categories and per-viewer poll displays.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::polls::{Category, Poll, PollDisplay, PollView, Question};
use crate::domain::ports::{CategoryRepository, PollQuery, PollRepository, VoteRepository};
use crate::domain::service_support::{
    map_category_repository_error, map_poll_repository_error, map_vote_repository_error,
    question_not_found,
};
use crate::domain::{Error, UserId};

/// Service implementing [`PollQuery`].
#[derive(Clone)]
pub struct PollQueryService<P, C, V> {
    polls: Arc<P>,
    categories: Arc<C>,
    votes: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<P, C, V> PollQueryService<P, C, V> {
    pub fn new(polls: Arc<P>, categories: Arc<C>, votes: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            polls,
            categories,
            votes,
            clock,
        }
    }
}

#[async_trait]
impl<P, C, V> PollQuery for PollQueryService<P, C, V>
where
    P: PollRepository,
    C: CategoryRepository,
    V: VoteRepository,
{
    async fn list_published_questions(&self) -> Result<Vec<Question>, Error> {
        self.polls
            .list_published(self.clock.utc())
            .await
            .map_err(map_poll_repository_error)
    }

    async fn get_published_question(&self, question_id: Uuid) -> Result<Poll, Error> {
        let now = self.clock.utc();
        self.polls
            .find_poll(&question_id)
            .await
            .map_err(map_poll_repository_error)?
            .filter(|poll| poll.question().is_published_at(now))
            .ok_or_else(|| question_not_found(question_id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.categories
            .list_categories()
            .await
            .map_err(map_category_repository_error)
    }

    async fn list_questions_in_category(
        &self,
        category_name: String,
    ) -> Result<Vec<Question>, Error> {
        self.polls
            .list_published_in_category(category_name.trim(), self.clock.utc())
            .await
            .map_err(map_poll_repository_error)
    }

    async fn view_poll(
        &self,
        question_id: Uuid,
        viewer: Option<UserId>,
    ) -> Result<PollDisplay, Error> {
        let now = self.clock.utc();
        let poll = self.get_published_question(question_id).await?;

        // Owners see results without a lookup; only other viewers need one.
        let has_voted = match viewer {
            Some(user) if !poll.question().is_owned_by(&user) => self
                .votes
                .has_voted(&question_id, &user)
                .await
                .map_err(map_vote_repository_error)?,
            _ => false,
        };
        let view = PollView::resolve(poll.question(), viewer.as_ref(), has_voted);
        let recently_published = poll.question().was_published_recently(now);

        Ok(PollDisplay {
            poll,
            view,
            recently_published,
        })
    }
}

#[cfg(test)]
#[path = "poll_query_service_tests.rs"]
mod tests;
