//! PostgreSQL-backed `PollRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::polls::{Choice, ChoiceText, Poll, Question, QuestionText};
use crate::domain::ports::{PollRepository, PollRepositoryError};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, constraints, pool_error_message, tally_from_db,
};
use super::models::{ChoiceRow, NewChoiceRow, NewQuestionRow, QuestionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, choices, questions, votes};

/// Diesel-backed implementation of the poll repository port.
#[derive(Clone)]
pub struct DieselPollRepository {
    pool: DbPool,
}

impl DieselPollRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PollRepositoryError {
    PollRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: DbFailure, category_id: Option<Uuid>) -> PollRepositoryError {
    match (failure, category_id) {
        (DbFailure::Connection(message), _) => PollRepositoryError::connection(message),
        (DbFailure::Conflict(message), _) => PollRepositoryError::conflict(message),
        (failure, Some(category_id))
            if failure.violates_foreign_key(constraints::QUESTION_CATEGORY_FK) =>
        {
            PollRepositoryError::category_not_found(category_id)
        }
        (failure, _) => PollRepositoryError::query(failure.into_message()),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PollRepositoryError {
    map_failure(classify_diesel_error(error), None)
}

fn question_from_row(row: QuestionRow) -> Result<Question, PollRepositoryError> {
    let text = QuestionText::new(&row.question_text).map_err(|err| {
        PollRepositoryError::query(format!("stored question {} is invalid: {err}", row.id))
    })?;
    Ok(Question::new(
        row.id,
        row.category_id,
        UserId::from_uuid(row.owner_id),
        text,
        row.publish_at,
    ))
}

fn choice_from_row(row: ChoiceRow) -> Result<Choice, PollRepositoryError> {
    let text = ChoiceText::new(&row.choice_text).map_err(|err| {
        PollRepositoryError::query(format!("stored choice {} is invalid: {err}", row.id))
    })?;
    Ok(Choice::new(
        row.id,
        row.question_id,
        text,
        tally_from_db(row.votes),
    ))
}

fn position_for_db(index: usize) -> Result<i32, PollRepositoryError> {
    i32::try_from(index).map_err(|_| PollRepositoryError::query("too many choices"))
}

#[async_trait]
impl PollRepository for DieselPollRepository {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), PollRepositoryError> {
        let question = poll.question();
        let question_row = NewQuestionRow {
            id: question.id(),
            category_id: question.category_id(),
            owner_id: *question.owner().as_uuid(),
            question_text: question.text().as_str(),
            publish_at: question.publish_at(),
        };
        let choice_rows = poll
            .choices()
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                Ok(NewChoiceRow {
                    id: choice.id(),
                    question_id: question.id(),
                    choice_text: choice.text().as_str(),
                    votes: 0,
                    position: position_for_db(index)?,
                })
            })
            .collect::<Result<Vec<_>, PollRepositoryError>>()?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(questions::table)
                    .values(&question_row)
                    .execute(conn)
                    .await?;
                if !choice_rows.is_empty() {
                    diesel::insert_into(choices::table)
                        .values(&choice_rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_failure(classify_diesel_error(err), Some(question.category_id())))
    }

    async fn find_poll(&self, question_id: &Uuid) -> Result<Option<Poll>, PollRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let question_id = *question_id;

        // One transaction so the question and its tallies are read together.
        let rows = conn
            .transaction(|conn| {
                async move {
                    let question: Option<QuestionRow> = questions::table
                        .filter(questions::id.eq(question_id))
                        .select(QuestionRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(question) = question else {
                        return Ok(None);
                    };
                    let choice_rows: Vec<ChoiceRow> = choices::table
                        .filter(choices::question_id.eq(question_id))
                        .select(ChoiceRow::as_select())
                        .order_by(choices::position.asc())
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some((question, choice_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((question_row, choice_rows)) = rows else {
            return Ok(None);
        };
        let question = question_from_row(question_row)?;
        let choices = choice_rows
            .into_iter()
            .map(choice_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Poll::new(question, choices)
            .map(Some)
            .map_err(|err| PollRepositoryError::query(err.to_string()))
    }

    async fn update_question_text(
        &self,
        question_id: &Uuid,
        text: &QuestionText,
    ) -> Result<bool, PollRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(questions::table.filter(questions::id.eq(*question_id)))
            .set(questions::question_text.eq(text.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_poll(&self, question_id: &Uuid) -> Result<bool, PollRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let question_id = *question_id;
        let deleted = conn
            .transaction(|conn| {
                async move {
                    let removed_votes =
                        diesel::delete(votes::table.filter(votes::question_id.eq(question_id)))
                            .execute(conn)
                            .await?;
                    diesel::delete(choices::table.filter(choices::question_id.eq(question_id)))
                        .execute(conn)
                        .await?;
                    let removed =
                        diesel::delete(questions::table.filter(questions::id.eq(question_id)))
                            .execute(conn)
                            .await?;
                    debug!(%question_id, removed_votes, "question deleted");
                    Ok::<_, diesel::result::Error>(removed > 0)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted)
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = questions::table
            .filter(questions::publish_at.le(now))
            .select(QuestionRow::as_select())
            .order_by((questions::publish_at.desc(), questions::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(question_from_row).collect()
    }

    async fn list_published_in_category(
        &self,
        category_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<QuestionRow> = questions::table
            .inner_join(categories::table)
            .filter(categories::category_name.eq(category_name))
            .filter(questions::publish_at.le(now))
            .select(QuestionRow::as_select())
            .order_by((questions::publish_at.desc(), questions::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(question_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping; queries are exercised against a
    //! live database only.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn question_row(text: &str) -> QuestionRow {
        QuestionRow {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            question_text: text.to_owned(),
            publish_at: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn question_rows_convert() {
        let row = question_row("Tea or coffee?");
        let id = row.id;
        let question = question_from_row(row).expect("valid row");
        assert_eq!(question.id(), id);
        assert_eq!(question.text().as_str(), "Tea or coffee?");
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let err = question_from_row(question_row("   ")).expect_err("blank text");
        assert!(matches!(err, PollRepositoryError::Query { .. }));
    }

    #[rstest]
    fn category_fk_violation_maps_to_category_not_found() {
        let category_id = Uuid::new_v4();
        let failure = DbFailure::ForeignKeyViolation {
            constraint: Some(constraints::QUESTION_CATEGORY_FK.to_owned()),
        };
        assert_eq!(
            map_failure(failure, Some(category_id)),
            PollRepositoryError::category_not_found(category_id)
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Uuid::nil()))]
    fn serialization_conflicts_map_to_conflict(#[case] category_id: Option<Uuid>) {
        let err = map_failure(
            DbFailure::Conflict("concurrent update, retry".to_owned()),
            category_id,
        );
        assert_eq!(err, PollRepositoryError::conflict("concurrent update, retry"));
    }

    #[rstest]
    fn connection_failures_stay_connection_errors() {
        let err = map_failure(DbFailure::Connection("gone".to_owned()), None);
        assert_eq!(err, PollRepositoryError::connection("gone"));
    }
}
