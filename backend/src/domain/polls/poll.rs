//! The question-plus-choices aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Choice, ChoiceText, PollValidationError, Question, QuestionText};
use crate::domain::UserId;

/// Input for building a brand new poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub category_id: Uuid,
    pub owner: UserId,
    pub text: QuestionText,
    pub choice_texts: Vec<ChoiceText>,
    pub publish_at: DateTime<Utc>,
}

/// A question with its ordered choices.
///
/// ## Invariants
/// - Every choice belongs to the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    question: Question,
    choices: Vec<Choice>,
}

impl Poll {
    /// Assemble a poll from stored parts.
    pub fn new(question: Question, choices: Vec<Choice>) -> Result<Self, PollValidationError> {
        if let Some(stray) = choices
            .iter()
            .find(|choice| choice.question_id() != question.id())
        {
            return Err(PollValidationError::ChoiceOfAnotherQuestion {
                choice_id: stray.id(),
            });
        }
        Ok(Self { question, choices })
    }

    /// Mint identifiers for a fresh poll. Tallies start at zero.
    pub fn from_draft(draft: PollDraft) -> Self {
        let PollDraft {
            category_id,
            owner,
            text,
            choice_texts,
            publish_at,
        } = draft;
        let question_id = Uuid::new_v4();
        let choices = choice_texts
            .into_iter()
            .map(|text| Choice::new(Uuid::new_v4(), question_id, text, 0))
            .collect();
        Self {
            question: Question::new(question_id, category_id, owner, text, publish_at),
            choices,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Choices in ballot order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, choice_id: Uuid) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id() == choice_id)
    }

    pub(crate) fn choice_mut(&mut self, choice_id: Uuid) -> Option<&mut Choice> {
        self.choices
            .iter_mut()
            .find(|choice| choice.id() == choice_id)
    }

    pub(crate) fn set_text(&mut self, text: QuestionText) {
        self.question.replace_text(text);
    }

    /// Sum of all tallies.
    pub fn total_votes(&self) -> u64 {
        self.choices
            .iter()
            .map(|choice| u64::from(choice.votes()))
            .sum()
    }

    pub fn into_parts(self) -> (Question, Vec<Choice>) {
        (self.question, self.choices)
    }
}
