//! Ballot-or-results resolution for a single poll display.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Poll, Question};
use crate::domain::UserId;

/// Which rendering of a poll the viewer gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PollView {
    /// Choice selection, tallies hidden.
    Ballot,
    /// Tallies.
    Results,
}

impl PollView {
    /// Owners and users who already voted see results; everyone else,
    /// anonymous viewers included, gets the ballot.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use polls::domain::UserId;
    /// use polls::domain::polls::{PollView, Question, QuestionText};
    /// use uuid::Uuid;
    ///
    /// let owner = UserId::random();
    /// let q = Question::new(Uuid::new_v4(), Uuid::new_v4(), owner,
    ///     QuestionText::new("Tea?").unwrap(), Utc::now());
    /// assert_eq!(PollView::resolve(&q, Some(&owner), false), PollView::Results);
    /// assert_eq!(PollView::resolve(&q, None, false), PollView::Ballot);
    /// ```
    pub fn resolve(question: &Question, viewer: Option<&UserId>, has_voted: bool) -> Self {
        match viewer {
            Some(user) if question.is_owned_by(user) => Self::Results,
            Some(_) if has_voted => Self::Results,
            _ => Self::Ballot,
        }
    }
}

/// A published poll prepared for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDisplay {
    pub poll: Poll,
    pub view: PollView,
    pub recently_published: bool,
}
