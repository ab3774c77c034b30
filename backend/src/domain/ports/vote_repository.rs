//! Port for recording votes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::polls::Vote;

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote repository adapters.
    pub enum VoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "vote repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "vote repository query failed: {message}",
        /// A vote by this voter already exists for the question.
        AlreadyVoted { question_id: Uuid } =>
            "a vote already exists for question {question_id}",
        /// The choice does not exist or belongs to another question.
        ChoiceNotFound { choice_id: Uuid } =>
            "choice {choice_id} is not part of the question",
        /// A concurrent transaction won; the caller may retry.
        Conflict { message: String } =>
            "vote transaction conflicted: {message}",
    }
}

/// Storage for votes and tallies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert `vote` and bump the chosen choice's tally in one transaction.
    ///
    /// Single-vote enforcement belongs to storage: a second vote for the same
    /// `(question_id, voter)` must fail with `AlreadyVoted` even under
    /// concurrent submissions. Returns the updated tally.
    async fn record_vote(&self, vote: &Vote) -> Result<u32, VoteRepositoryError>;

    /// Whether `voter` has a vote recorded for the question.
    async fn has_voted(
        &self,
        question_id: &Uuid,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError>;
}

/// Fixture implementation for wiring without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteRepository;

#[async_trait]
impl VoteRepository for FixtureVoteRepository {
    async fn record_vote(&self, _vote: &Vote) -> Result<u32, VoteRepositoryError> {
        Ok(1)
    }

    async fn has_voted(
        &self,
        _question_id: &Uuid,
        _voter: &UserId,
    ) -> Result<bool, VoteRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_no_prior_votes() {
        let voted = FixtureVoteRepository
            .has_voted(&Uuid::new_v4(), &UserId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(!voted);
    }

    #[rstest]
    fn conflict_message_is_preserved() {
        let err = VoteRepositoryError::conflict("serialization failure");
        assert_eq!(
            err.to_string(),
            "vote transaction conflicted: serialization failure"
        );
    }
}
