//! Poll questions and their visibility rules.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::PollValidationError;
use crate::domain::UserId;

/// Maximum question text length in characters.
pub const QUESTION_TEXT_MAX: usize = 201;

/// Non-blank question text of at most [`QUESTION_TEXT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionText(String);

impl QuestionText {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PollValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PollValidationError::EmptyQuestionText);
        }
        if trimmed.chars().count() > QUESTION_TEXT_MAX {
            return Err(PollValidationError::QuestionTextTooLong {
                max: QUESTION_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for QuestionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A poll question.
///
/// ## Invariants
/// - The question is published iff `now >= publish_at`; a question
///   published exactly at `now` is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: Uuid,
    category_id: Uuid,
    owner: UserId,
    text: QuestionText,
    publish_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        id: Uuid,
        category_id: Uuid,
        owner: UserId,
        text: QuestionText,
        publish_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category_id,
            owner,
            text,
            publish_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn text(&self) -> &QuestionText {
        &self.text
    }

    pub fn publish_at(&self) -> DateTime<Utc> {
        self.publish_at
    }

    /// Whether the question is visible at `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.publish_at
    }

    /// Published within the 24 hours up to and including `now`.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        self.publish_at <= now && self.publish_at >= now - Duration::days(1)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Replace the text, leaving everything else untouched.
    pub(crate) fn replace_text(&mut self, text: QuestionText) {
        self.text = text;
    }
}
