//! Voting: one vote per user per question, recorded with its tally bump.
//!
//! The service checks that the question is published and that the choice is
//! part of it, then hands the vote to storage. Storage owns the single-vote
//! guarantee: a pre-check here could race with a concurrent submit.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::polls::Vote;
use crate::domain::ports::{
    CastVoteRequest, CastVoteResponse, PollRepository, VoteRepository, VotingCommand,
};
use crate::domain::service_support::{
    map_poll_repository_error, map_vote_repository_error, question_not_found,
};
use crate::domain::{Error, UserId};

/// Service implementing [`VotingCommand`].
#[derive(Clone)]
pub struct VotingService<P, V> {
    polls: Arc<P>,
    votes: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<P, V> VotingService<P, V> {
    pub fn new(polls: Arc<P>, votes: Arc<V>, clock: Arc<dyn Clock>) -> Self {
        Self {
            polls,
            votes,
            clock,
        }
    }
}

#[async_trait]
impl<P, V> VotingCommand for VotingService<P, V>
where
    P: PollRepository,
    V: VoteRepository,
{
    async fn cast_vote(&self, request: CastVoteRequest) -> Result<CastVoteResponse, Error> {
        let CastVoteRequest {
            voter,
            question_id,
            choice_id,
        } = request;
        let now = self.clock.utc();

        let poll = self
            .polls
            .find_poll(&question_id)
            .await
            .map_err(map_poll_repository_error)?
            .filter(|poll| poll.question().is_published_at(now))
            .ok_or_else(|| question_not_found(question_id))?;
        if poll.choice(choice_id).is_none() {
            return Err(Error::not_found("choice not found").with_details(json!({
                "questionId": question_id,
                "choiceId": choice_id,
                "code": "choice_not_found",
            })));
        }

        let vote = Vote {
            id: Uuid::new_v4(),
            question_id,
            choice_id,
            voter,
            cast_at: now,
        };
        let tally = self
            .votes
            .record_vote(&vote)
            .await
            .map_err(map_vote_repository_error)?;

        info!(%question_id, %choice_id, tally, "vote recorded");
        Ok(CastVoteResponse {
            question_id,
            choice_id,
            tally,
        })
    }

    async fn has_voted(&self, voter: UserId, question_id: Uuid) -> Result<bool, Error> {
        self.votes
            .has_voted(&question_id, &voter)
            .await
            .map_err(map_vote_repository_error)
    }
}

#[cfg(test)]
#[path = "voting_service_tests.rs"]
mod tests;
