//! Poll HTTP handlers.
//!
//! ```text
//! GET    /api/v1/polls
//! POST   /api/v1/polls {"categoryId":"...","questionText":"Tea or coffee?","choices":["Tea","Coffee"]}
//! GET    /api/v1/polls/{id}
//! GET    /api/v1/polls/{id}/results
//! PATCH  /api/v1/polls/{id} {"questionText":"Coffee or tea?"}
//! DELETE /api/v1/polls/{id}
//! POST   /api/v1/polls/{id}/votes {"choiceId":"..."}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::Error;
use crate::domain::ports::{
    CastVoteRequest, CreateQuestionRequest, DeleteQuestionRequest, EditQuestionRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::polls_dto::{
    CastVoteRequestBody, CastVoteResponseBody, CreatePollRequestBody, CreatePollResponseBody,
    EditPollRequestBody, PollDetailBody, QuestionSummaryBody,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_choice_error, missing_field_error, parse_uuid, require_uuid,
};

const QUESTION_ID: FieldName = FieldName::new("id");
const CATEGORY_ID: FieldName = FieldName::new("categoryId");
const CHOICE_ID: FieldName = FieldName::new("choiceId");

/// Published questions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/polls",
    responses(
        (status = 200, description = "Published questions", body = [QuestionSummaryBody]),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "listPolls",
    security([])
)]
#[get("/polls")]
pub async fn list_polls(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<QuestionSummaryBody>>> {
    let questions = state.polls.list_published_questions().await?;
    Ok(web::Json(
        questions.iter().map(QuestionSummaryBody::from).collect(),
    ))
}

/// Create a question owned by the signed-in user, published immediately.
#[utoipa::path(
    post,
    path = "/api/v1/polls",
    request_body = CreatePollRequestBody,
    responses(
        (status = 201, description = "Question created", body = CreatePollResponseBody),
        (status = 400, description = "Invalid question", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Unknown category", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "createPoll"
)]
#[post("/polls")]
pub async fn create_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePollRequestBody>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let CreatePollRequestBody {
        category_id,
        question_text,
        choices,
    } = payload.into_inner();
    let category_id = require_uuid(category_id.as_deref(), CATEGORY_ID, missing_field_error)?;

    let created = state
        .lifecycle
        .create_question(CreateQuestionRequest {
            owner,
            category_id,
            text: question_text,
            choice_texts: choices,
        })
        .await?;
    Ok(HttpResponse::Created().json(CreatePollResponseBody {
        id: created.question_id.to_string(),
    }))
}

/// A published question rendered for the caller.
///
/// Anonymous callers and users who have not voted get the ballot; owners
/// and users who already voted get the results.
#[utoipa::path(
    get,
    path = "/api/v1/polls/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 200, description = "Poll", body = PollDetailBody),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found or not yet published", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "getPoll",
    security([])
)]
#[get("/polls/{id}")]
pub async fn get_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollDetailBody>> {
    let question_id = parse_uuid(&path.into_inner(), QUESTION_ID)?;
    let viewer = session.user_id()?;
    let display = state.polls.view_poll(question_id, viewer).await?;
    Ok(web::Json(PollDetailBody::from(&display)))
}

/// Tallies for a published question.
#[utoipa::path(
    get,
    path = "/api/v1/polls/{id}/results",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 200, description = "Results", body = PollDetailBody),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found or not yet published", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "getPollResults",
    security([])
)]
#[get("/polls/{id}/results")]
pub async fn poll_results(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PollDetailBody>> {
    let question_id = parse_uuid(&path.into_inner(), QUESTION_ID)?;
    let poll = state.polls.get_published_question(question_id).await?;
    Ok(web::Json(PollDetailBody::results(&poll)))
}

/// Replace the question text. Owner only.
#[utoipa::path(
    patch,
    path = "/api/v1/polls/{id}",
    params(("id" = String, Path, description = "Question id")),
    request_body = EditPollRequestBody,
    responses(
        (status = 204, description = "Question updated"),
        (status = 400, description = "Invalid text", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "editPoll"
)]
#[patch("/polls/{id}")]
pub async fn edit_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditPollRequestBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let question_id = parse_uuid(&path.into_inner(), QUESTION_ID)?;
    state
        .lifecycle
        .edit_question(EditQuestionRequest {
            requester,
            question_id,
            text: payload.into_inner().question_text,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a question with its choices and votes. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/polls/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "deletePoll"
)]
#[delete("/polls/{id}")]
pub async fn delete_poll(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let question_id = parse_uuid(&path.into_inner(), QUESTION_ID)?;
    state
        .lifecycle
        .delete_question(DeleteQuestionRequest {
            requester,
            question_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Cast the caller's single vote on a published question.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{id}/votes",
    params(("id" = String, Path, description = "Question id")),
    request_body = CastVoteRequestBody,
    responses(
        (status = 201, description = "Vote recorded", body = CastVoteResponseBody),
        (status = 400, description = "No choice selected", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Question or choice not found", body = Error),
        (status = 409, description = "Already voted, or retry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["polls"],
    operation_id = "castVote"
)]
#[post("/polls/{id}/votes")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CastVoteRequestBody>,
) -> ApiResult<HttpResponse> {
    let voter = session.require_user_id()?;
    let question_id = parse_uuid(&path.into_inner(), QUESTION_ID)?;
    let choice_id = require_uuid(
        payload.choice_id.as_deref(),
        CHOICE_ID,
        missing_choice_error,
    )?;

    let recorded = state
        .voting
        .cast_vote(CastVoteRequest {
            voter,
            question_id,
            choice_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(CastVoteResponseBody {
        question_id: recorded.question_id.to_string(),
        choice_id: recorded.choice_id.to_string(),
        tally: recorded.tally,
    }))
}

#[cfg(test)]
#[path = "polls_tests.rs"]
mod tests;
