//! Wire shapes for the poll endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::polls::{Choice, Poll, PollDisplay, PollView, Question};

/// Body for `POST /api/v1/polls`.
///
/// Blank choice entries are dropped before validation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePollRequestBody {
    #[schema(format = "uuid")]
    pub category_id: Option<String>,
    pub question_text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
}

/// Body for `PATCH /api/v1/polls/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EditPollRequestBody {
    pub question_text: String,
}

/// Body for `POST /api/v1/polls/{id}/votes`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CastVoteRequestBody {
    #[schema(format = "uuid")]
    pub choice_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponseBody {
    #[schema(format = "uuid")]
    pub question_id: String,
    #[schema(format = "uuid")]
    pub choice_id: String,
    /// Votes on the chosen option after this one was counted.
    pub tally: u32,
}

/// One line in a poll listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummaryBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub category_id: String,
    pub question_text: String,
    #[schema(format = "date-time")]
    pub publish_at: String,
}

impl From<&Question> for QuestionSummaryBody {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id().to_string(),
            category_id: question.category_id().to_string(),
            question_text: question.text().to_string(),
            publish_at: question.publish_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub text: String,
    /// Present only in the results view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<u32>,
}

impl ChoiceBody {
    fn from_choice(choice: &Choice, view: PollView) -> Self {
        Self {
            id: choice.id().to_string(),
            text: choice.text().to_string(),
            votes: (view == PollView::Results).then(|| choice.votes()),
        }
    }
}

/// A single poll as one viewer sees it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollDetailBody {
    #[serde(flatten)]
    pub question: QuestionSummaryBody,
    pub view: PollView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recently_published: Option<bool>,
    pub choices: Vec<ChoiceBody>,
    /// Present only in the results view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_votes: Option<u64>,
}

impl PollDetailBody {
    fn build(poll: &Poll, view: PollView, recently_published: Option<bool>) -> Self {
        Self {
            question: QuestionSummaryBody::from(poll.question()),
            view,
            recently_published,
            choices: poll
                .choices()
                .iter()
                .map(|choice| ChoiceBody::from_choice(choice, view))
                .collect(),
            total_votes: (view == PollView::Results).then(|| poll.total_votes()),
        }
    }

    /// Tallies for everyone, regardless of who asks.
    pub fn results(poll: &Poll) -> Self {
        Self::build(poll, PollView::Results, None)
    }
}

impl From<&PollDisplay> for PollDetailBody {
    fn from(display: &PollDisplay) -> Self {
        Self::build(&display.poll, display.view, Some(display.recently_published))
    }
}
