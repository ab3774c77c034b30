//! Process-local storage implementing every driven port.
//!
//! Used when no database is configured and by the behaviour tests. All state
//! sits behind one mutex, so each port call is atomic with respect to every
//! other call: a vote insert and its tally bump can never be observed apart,
//! and two votes by the same voter cannot both pass the uniqueness check.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::polls::{Category, CategoryName, Poll, Question, QuestionText, Vote};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CategoryRepository, CategoryRepositoryError,
    PollRepository, PollRepositoryError, VoteRepository, VoteRepositoryError,
};
use crate::domain::{Account, UserId};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    accounts: Vec<Account>,
    polls: Vec<Poll>,
    votes: Vec<Vote>,
}

impl State {
    fn poll_mut(&mut self, question_id: &Uuid) -> Option<&mut Poll> {
        self.polls
            .iter_mut()
            .find(|poll| poll.question().id() == *question_id)
    }

    fn published(&self, now: DateTime<Utc>, category_id: Option<Uuid>) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .polls
            .iter()
            .map(Poll::question)
            .filter(|question| question.is_published_at(now))
            .filter(|question| category_id.is_none_or(|id| question.category_id() == id))
            .cloned()
            .collect();
        questions.sort_by(|a, b| {
            b.publish_at()
                .cmp(&a.publish_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        questions
    }
}

const POISONED: &str = "in-memory store lock poisoned";

/// Mutex-guarded store backing the poll, vote, category and account ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl PollRepository for InMemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), PollRepositoryError> {
        let mut state = self.lock().map_err(PollRepositoryError::query)?;
        let category_id = poll.question().category_id();
        if !state.categories.iter().any(|c| c.id() == category_id) {
            return Err(PollRepositoryError::category_not_found(category_id));
        }
        let question_id = poll.question().id();
        if state.polls.iter().any(|p| p.question().id() == question_id) {
            return Err(PollRepositoryError::query(format!(
                "question {question_id} already exists"
            )));
        }
        state.polls.push(poll.clone());
        Ok(())
    }

    async fn find_poll(&self, question_id: &Uuid) -> Result<Option<Poll>, PollRepositoryError> {
        let state = self.lock().map_err(PollRepositoryError::query)?;
        Ok(state
            .polls
            .iter()
            .find(|poll| poll.question().id() == *question_id)
            .cloned())
    }

    async fn update_question_text(
        &self,
        question_id: &Uuid,
        text: &QuestionText,
    ) -> Result<bool, PollRepositoryError> {
        let mut state = self.lock().map_err(PollRepositoryError::query)?;
        Ok(state
            .poll_mut(question_id)
            .map(|poll| poll.set_text(text.clone()))
            .is_some())
    }

    async fn delete_poll(&self, question_id: &Uuid) -> Result<bool, PollRepositoryError> {
        let mut state = self.lock().map_err(PollRepositoryError::query)?;
        let before = state.polls.len();
        state.polls.retain(|poll| poll.question().id() != *question_id);
        if state.polls.len() == before {
            return Ok(false);
        }
        state.votes.retain(|vote| vote.question_id != *question_id);
        Ok(true)
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        let state = self.lock().map_err(PollRepositoryError::query)?;
        Ok(state.published(now, None))
    }

    async fn list_published_in_category(
        &self,
        category_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, PollRepositoryError> {
        let state = self.lock().map_err(PollRepositoryError::query)?;
        let Some(category_id) = state
            .categories
            .iter()
            .find(|category| category.name().as_str() == category_name)
            .map(Category::id)
        else {
            return Ok(Vec::new());
        };
        Ok(state.published(now, Some(category_id)))
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn record_vote(&self, vote: &Vote) -> Result<u32, VoteRepositoryError> {
        let mut state = self.lock().map_err(VoteRepositoryError::query)?;
        if state
            .votes
            .iter()
            .any(|v| v.question_id == vote.question_id && v.voter == vote.voter)
        {
            return Err(VoteRepositoryError::already_voted(vote.question_id));
        }
        let tally = state
            .poll_mut(&vote.question_id)
            .and_then(|poll| poll.choice_mut(vote.choice_id))
            .map(|choice| choice.record_vote())
            .ok_or_else(|| VoteRepositoryError::choice_not_found(vote.choice_id))?;
        state.votes.push(vote.clone());
        Ok(tally)
    }

    async fn has_voted(
        &self,
        question_id: &Uuid,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError> {
        let state = self.lock().map_err(VoteRepositoryError::query)?;
        Ok(state
            .votes
            .iter()
            .any(|vote| vote.question_id == *question_id && vote.voter == *voter))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let state = self.lock().map_err(CategoryRepositoryError::query)?;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.name().as_str().cmp(b.name().as_str()))
        });
        Ok(categories)
    }

    async fn find_category(&self, id: &Uuid) -> Result<Option<Category>, CategoryRepositoryError> {
        let state = self.lock().map_err(CategoryRepositoryError::query)?;
        Ok(state.categories.iter().find(|c| c.id() == *id).cloned())
    }

    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let state = self.lock().map_err(CategoryRepositoryError::query)?;
        Ok(state.categories.iter().find(|c| c.name() == name).cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        let mut state = self.lock().map_err(CategoryRepositoryError::query)?;
        if state.categories.iter().any(|c| c.name() == category.name()) {
            return Err(CategoryRepositoryError::duplicate_name(
                category.name().as_str(),
            ));
        }
        state.categories.push(category.clone());
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.email.as_str() == email)
            .cloned())
    }

    async fn insert_account(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::query)?;
        if state
            .accounts
            .iter()
            .any(|existing| existing.username == account.username)
        {
            return Err(AccountRepositoryError::DuplicateUsername);
        }
        if state
            .accounts
            .iter()
            .any(|existing| existing.email == account.email)
        {
            return Err(AccountRepositoryError::DuplicateEmail);
        }
        state.accounts.push(account.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
