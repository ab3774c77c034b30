//! OpenAPI documentation for the REST surface.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health checks,
//! the shared error payload and the request/response bodies. Swagger UI
//! serves it in debug builds and `openapi-dump` prints it for tooling.

use crate::domain::polls::PollView;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::categories::{CategoryBody, CategorySummaryBody, CreateCategoryBody};
use crate::inbound::http::polls_dto::{
    CastVoteRequestBody, CastVoteResponseBody, ChoiceBody, CreatePollRequestBody,
    CreatePollResponseBody, EditPollRequestBody, PollDetailBody, QuestionSummaryBody,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequestBody, RegisterResponseBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the polls API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Polls API",
        description = "Categorised questions with one vote per signed-in user.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::polls::list_polls,
        crate::inbound::http::polls::create_poll,
        crate::inbound::http::polls::get_poll,
        crate::inbound::http::polls::poll_results,
        crate::inbound::http::polls::edit_poll,
        crate::inbound::http::polls::delete_poll,
        crate::inbound::http::polls::cast_vote,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::list_category_polls,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        RegisterRequestBody,
        RegisterResponseBody,
        CreatePollRequestBody,
        CreatePollResponseBody,
        EditPollRequestBody,
        CastVoteRequestBody,
        CastVoteResponseBody,
        QuestionSummaryBody,
        ChoiceBody,
        PollDetailBody,
        PollView,
        CategorySummaryBody,
        CreateCategoryBody,
        CategoryBody,
    )),
    tags(
        (name = "users", description = "Registration and session login"),
        (name = "polls", description = "Questions, ballots and votes"),
        (name = "categories", description = "Category records and pages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn category_record_keeps_snake_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let category = schemas.get("CategoryBody").expect("CategoryBody schema");

        assert_object_schema_has_field(category, "category_name");
        assert_object_schema_has_field(category, "img");
    }

    #[test]
    fn poll_view_is_a_documented_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key("PollView"));
        let detail = serde_json::to_string(schemas.get("PollDetailBody").expect("detail"))
            .expect("schema serialises");
        assert!(detail.contains("#/components/schemas/PollView"));
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/polls")]
    #[case("/api/v1/polls/{id}")]
    #[case("/api/v1/polls/{id}/results")]
    #[case("/api/v1/polls/{id}/votes")]
    #[case("/api/v1/categories")]
    #[case("/api/v1/categories/{name}/polls")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
