//! Answer options for a question.

use std::fmt;

use uuid::Uuid;

use super::PollValidationError;

/// Maximum choice text length in characters.
pub const CHOICE_TEXT_MAX: usize = 200;

/// Non-blank choice text of at most [`CHOICE_TEXT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceText(String);

impl ChoiceText {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PollValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PollValidationError::EmptyChoiceText);
        }
        if trimmed.chars().count() > CHOICE_TEXT_MAX {
            return Err(PollValidationError::ChoiceTextTooLong {
                index: 0,
                max: CHOICE_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChoiceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn submitted choice entries into validated texts.
///
/// Blank entries are skipped and order is preserved. A too-long entry fails
/// with its position in `entries`.
///
/// # Examples
/// ```
/// use polls::domain::polls::parse_choice_entries;
///
/// let texts = parse_choice_entries(["Red", "  ", "Blue"]).unwrap();
/// let texts: Vec<_> = texts.iter().map(|t| t.as_str()).collect();
/// assert_eq!(texts, ["Red", "Blue"]);
/// ```
pub fn parse_choice_entries<I, S>(entries: I) -> Result<Vec<ChoiceText>, PollValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .enumerate()
        .filter(|(_, entry)| !entry.as_ref().trim().is_empty())
        .map(|(index, entry)| {
            ChoiceText::new(entry).map_err(|err| match err {
                PollValidationError::ChoiceTextTooLong { max, .. } => {
                    PollValidationError::ChoiceTextTooLong { index, max }
                }
                other => other,
            })
        })
        .collect()
}

/// One option on a ballot with its running tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    id: Uuid,
    question_id: Uuid,
    text: ChoiceText,
    votes: u32,
}

impl Choice {
    pub fn new(id: Uuid, question_id: Uuid, text: ChoiceText, votes: u32) -> Self {
        Self {
            id,
            question_id,
            text,
            votes,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    pub fn text(&self) -> &ChoiceText {
        &self.text
    }

    /// Current tally.
    pub fn votes(&self) -> u32 {
        self.votes
    }

    /// Bump the tally by one, returning the new value.
    pub(crate) fn record_vote(&mut self) -> u32 {
        self.votes = self.votes.saturating_add(1);
        self.votes
    }
}
