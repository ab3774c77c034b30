//! Tests for error construction, trace capture and serde round-tripping.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::already_voted("twice"), ErrorCode::AlreadyVoted)]
#[case(Error::conflict("clash"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn new_substitutes_a_message_for_blank_input() {
    let error = Error::new(ErrorCode::NotFound, "  ");
    assert_eq!(error.message(), "not found");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_outside_a_request_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixture provides a valid UUID");
    let error = TraceId::scope(trace_id, async { Error::conflict("clash") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("question not found"))
        .expect("error serialises");
    assert_eq!(
        value,
        json!({"code": "not_found", "message": "question not found"})
    );
}

#[rstest]
fn already_voted_code_serialises_in_snake_case() {
    let value = serde_json::to_value(ErrorCode::AlreadyVoted).expect("code serialises");
    assert_eq!(value, json!("already_voted"));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_the_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixture provides a valid UUID");
    let payload = json!({"code": "invalid_request", "message": "bad"});

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("payload is valid")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialising_keeps_payload_trace_and_details(expected_trace_id: String) {
    let payload = json!({
        "code": "already_voted",
        "message": "you have already voted on this question",
        "traceId": expected_trace_id,
        "details": {"questionId": "q"}
    });
    let error: Error = serde_json::from_value(payload).expect("payload is valid");

    assert_eq!(error.code(), ErrorCode::AlreadyVoted);
    assert_eq!(error.trace_id(), Some(TRACE_ID));
    assert_eq!(error.details(), Some(&json!({"questionId": "q"})));
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({"code": "not_found", "message": " "});
    assert!(serde_json::from_value::<Error>(payload).is_err());
}
