//! PostgreSQL-backed `VoteRepository` implementation using Diesel ORM.
//!
//! The vote row and the tally bump share one transaction. The
//! `(question_id, voter_id)` unique constraint rejects a second vote even
//! when two submissions race, and `votes = votes + 1` is evaluated by the
//! database so concurrent votes never lose an increment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::polls::Vote;
use crate::domain::ports::{VoteRepository, VoteRepositoryError};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, constraints, pool_error_message, tally_from_db,
};
use super::models::NewVoteRow;
use super::pool::{DbPool, PoolError};
use super::schema::{choices, votes};

/// Diesel-backed implementation of the vote repository port.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VoteRepositoryError {
    VoteRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: DbFailure, vote: Option<&Vote>) -> VoteRepositoryError {
    match (failure, vote) {
        (DbFailure::Connection(message), _) => VoteRepositoryError::connection(message),
        (DbFailure::Conflict(message), _) => VoteRepositoryError::conflict(message),
        (failure, Some(vote)) if failure.violates_unique(constraints::VOTE_PER_VOTER_UNIQUE) => {
            VoteRepositoryError::already_voted(vote.question_id)
        }
        (failure, Some(vote)) if failure.violates_foreign_key(constraints::VOTE_CHOICE_FK) => {
            VoteRepositoryError::choice_not_found(vote.choice_id)
        }
        (failure, _) => VoteRepositoryError::query(failure.into_message()),
    }
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn record_vote(&self, vote: &Vote) -> Result<u32, VoteRepositoryError> {
        let row = NewVoteRow {
            id: vote.id,
            question_id: vote.question_id,
            choice_id: vote.choice_id,
            voter_id: *vote.voter.as_uuid(),
            cast_at: vote.cast_at,
        };
        let (question_id, choice_id) = (vote.question_id, vote.choice_id);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tally = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(votes::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    diesel::update(
                        choices::table
                            .filter(choices::id.eq(choice_id))
                            .filter(choices::question_id.eq(question_id)),
                    )
                    .set(choices::votes.eq(choices::votes + 1))
                    .returning(choices::votes)
                    .get_result::<i32>(conn)
                    .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_failure(classify_diesel_error(err), Some(vote)))?;

        Ok(tally_from_db(tally))
    }

    async fn has_voted(
        &self,
        question_id: &Uuid,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            votes::table
                .filter(votes::question_id.eq(*question_id))
                .filter(votes::voter_id.eq(*voter.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|err| map_failure(classify_diesel_error(err), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn vote() -> Vote {
        Vote {
            id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            choice_id: Uuid::new_v4(),
            voter: UserId::random(),
            cast_at: Utc::now(),
        }
    }

    #[rstest]
    fn duplicate_vote_maps_to_already_voted(vote: Vote) {
        let failure = DbFailure::UniqueViolation {
            constraint: Some(constraints::VOTE_PER_VOTER_UNIQUE.to_owned()),
        };
        assert_eq!(
            map_failure(failure, Some(&vote)),
            VoteRepositoryError::already_voted(vote.question_id)
        );
    }

    #[rstest]
    fn foreign_choice_maps_to_choice_not_found(vote: Vote) {
        let failure = DbFailure::ForeignKeyViolation {
            constraint: Some(constraints::VOTE_CHOICE_FK.to_owned()),
        };
        assert_eq!(
            map_failure(failure, Some(&vote)),
            VoteRepositoryError::choice_not_found(vote.choice_id)
        );
    }

    #[rstest]
    fn serialization_failures_are_retryable_conflicts(vote: Vote) {
        let err = map_failure(DbFailure::Conflict("retry".to_owned()), Some(&vote));
        assert_eq!(err, VoteRepositoryError::conflict("retry"));
    }

    #[rstest]
    fn unknown_unique_violation_is_a_query_error(vote: Vote) {
        let failure = DbFailure::UniqueViolation {
            constraint: Some("votes_pkey".to_owned()),
        };
        assert!(matches!(
            map_failure(failure, Some(&vote)),
            VoteRepositoryError::Query { .. }
        ));
    }
}
