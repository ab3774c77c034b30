//! Driving port for casting votes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVoteRequest {
    pub voter: UserId,
    pub question_id: Uuid,
    pub choice_id: Uuid,
}

/// Outcome of a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVoteResponse {
    pub question_id: Uuid,
    pub choice_id: Uuid,
    /// The chosen option's tally after this vote.
    pub tally: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VotingCommand: Send + Sync {
    /// Record one vote and bump the chosen tally.
    ///
    /// Fails with `not_found` when the question is missing or unpublished,
    /// or the choice is not part of it, and with `already_voted` on a second
    /// attempt by the same voter.
    async fn cast_vote(&self, request: CastVoteRequest) -> Result<CastVoteResponse, Error>;

    /// Whether `voter` has already voted on the question.
    async fn has_voted(&self, voter: UserId, question_id: Uuid) -> Result<bool, Error>;
}

/// Rejects every vote as targeting a missing question.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVotingCommand;

#[async_trait]
impl VotingCommand for FixtureVotingCommand {
    async fn cast_vote(&self, _request: CastVoteRequest) -> Result<CastVoteResponse, Error> {
        Err(Error::not_found("question not found"))
    }

    async fn has_voted(&self, _voter: UserId, _question_id: Uuid) -> Result<bool, Error> {
        Ok(false)
    }
}
