//! Poll domain: categories, questions, choices and votes.
//!
//! A [`Poll`] is the aggregate written and read by the lifecycle and query
//! services: one [`Question`] plus its ordered [`Choice`] list. Visibility is
//! decided by comparing the question's publish timestamp with "now", which
//! callers always pass in explicitly.

use std::fmt;

use uuid::Uuid;

mod category;
mod choice;
mod poll;
mod question;
mod view;
mod vote;

pub use category::{CATEGORY_NAME_MAX, Category, CategoryName};
pub use choice::{CHOICE_TEXT_MAX, Choice, ChoiceText, parse_choice_entries};
pub use poll::{Poll, PollDraft};
pub use question::{QUESTION_TEXT_MAX, Question, QuestionText};
pub use view::{PollDisplay, PollView};
pub use vote::Vote;

/// Validation errors raised by poll constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollValidationError {
    EmptyCategoryName,
    CategoryNameTooLong { max: usize },
    EmptyQuestionText,
    QuestionTextTooLong { max: usize },
    EmptyChoiceText,
    ChoiceTextTooLong { index: usize, max: usize },
    ChoiceOfAnotherQuestion { choice_id: Uuid },
}

impl PollValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyCategoryName | Self::CategoryNameTooLong { .. } => "category_name",
            Self::EmptyQuestionText | Self::QuestionTextTooLong { .. } => "questionText",
            Self::EmptyChoiceText
            | Self::ChoiceTextTooLong { .. }
            | Self::ChoiceOfAnotherQuestion { .. } => "choices",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyCategoryName | Self::EmptyQuestionText | Self::EmptyChoiceText => {
                "required"
            }
            Self::CategoryNameTooLong { .. }
            | Self::QuestionTextTooLong { .. }
            | Self::ChoiceTextTooLong { .. } => "too_long",
            Self::ChoiceOfAnotherQuestion { .. } => "foreign_choice",
        }
    }
}

impl fmt::Display for PollValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategoryName => write!(f, "category name must not be blank"),
            Self::CategoryNameTooLong { max } => {
                write!(f, "category name must be at most {max} characters")
            }
            Self::EmptyQuestionText => write!(f, "question text must not be blank"),
            Self::QuestionTextTooLong { max } => {
                write!(f, "question text must be at most {max} characters")
            }
            Self::EmptyChoiceText => write!(f, "choice text must not be blank"),
            Self::ChoiceTextTooLong { index, max } => {
                write!(f, "choice {index} must be at most {max} characters")
            }
            Self::ChoiceOfAnotherQuestion { choice_id } => {
                write!(f, "choice {choice_id} belongs to another question")
            }
        }
    }
}

impl std::error::Error for PollValidationError {}
