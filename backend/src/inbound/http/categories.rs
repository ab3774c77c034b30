//! Category interchange handlers.
//!
//! These keep the snake_case `{id, category_name, img}` record shape.
//!
//! ```text
//! GET  /api/v1/categories
//! POST /api/v1/categories {"category_name":"Games","img":"games.png"}
//! GET  /api/v1/categories/{name}/polls
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::polls::Category;
use crate::domain::ports::CreateCategoryRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::polls_dto::QuestionSummaryBody;
use crate::inbound::http::state::HttpState;

/// Entry in `GET /api/v1/categories`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub category_name: String,
}

impl From<&Category> for CategorySummaryBody {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            category_name: category.name().to_string(),
        }
    }
}

/// Body for `POST /api/v1/categories`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateCategoryBody {
    pub category_name: Option<String>,
    pub img: Option<String>,
}

/// The stored category record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub category_name: String,
    pub img: Option<String>,
}

impl From<&Category> for CategoryBody {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            category_name: category.name().to_string(),
            img: category.image().map(str::to_owned),
        }
    }
}

/// All categories, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = [CategorySummaryBody]),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategorySummaryBody>>> {
    let categories = state.polls.list_categories().await?;
    Ok(web::Json(
        categories.iter().map(CategorySummaryBody::from).collect(),
    ))
}

/// Create a category.
///
/// Validation failures return 400 with `details.errors` listing each
/// failed field.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryBody,
    responses(
        (status = 201, description = "Category created", body = CategoryBody),
        (status = 400, description = "Field errors", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["categories"],
    operation_id = "createCategory",
    security([])
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCategoryBody>,
) -> ApiResult<HttpResponse> {
    let CreateCategoryBody { category_name, img } = payload.into_inner();
    let category = state
        .categories
        .create_category(CreateCategoryRequest {
            name: category_name,
            image: img,
        })
        .await?;
    Ok(HttpResponse::Created().json(CategoryBody::from(&category)))
}

/// Published questions in the named category, newest first.
///
/// An unknown name yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{name}/polls",
    params(("name" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Published questions", body = [QuestionSummaryBody]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["categories"],
    operation_id = "listCategoryPolls",
    security([])
)]
#[get("/categories/{name}/polls")]
pub async fn list_category_polls(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<QuestionSummaryBody>>> {
    let questions = state
        .polls
        .list_questions_in_category(path.into_inner())
        .await?;
    Ok(web::Json(
        questions.iter().map(QuestionSummaryBody::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CreateQuestionRequest, MockPollQuery};
    use crate::domain::UserId;
    use crate::inbound::http::test_utils::in_memory_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(list_categories)
                .service(create_category)
                .service(list_category_polls),
        )
    }

    #[actix_web::test]
    async fn created_categories_are_listed_without_images() {
        let (state, _, _) = in_memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(json!({"category_name": "Games", "img": "games.png"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(res).await;
        assert_eq!(created["category_name"], "Games");
        assert_eq!(created["img"], "games.png");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/categories")
                .to_request(),
        )
        .await;
        let listed: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            listed,
            json!([{"id": created["id"], "category_name": "Games"}])
        );
    }

    #[rstest]
    #[case(json!({}), "required")]
    #[case(json!({"category_name": "   "}), "required")]
    #[case(json!({"category_name": "x".repeat(31)}), "too_long")]
    #[actix_web::test]
    async fn invalid_names_are_field_errors(#[case] body: Value, #[case] code: &str) {
        let (state, _, _) = in_memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/categories")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["details"]["errors"][0]["field"], "category_name");
        assert_eq!(value["details"]["errors"][0]["code"], code);
    }

    #[actix_web::test]
    async fn duplicate_name_is_a_field_error() {
        let (state, _, _) = in_memory_state();
        let app = actix_test::init_service(test_app(state)).await;

        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/categories")
                    .set_json(json!({"category_name": "Games"}))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }
    }

    #[actix_web::test]
    async fn category_page_lists_its_published_questions() {
        let (state, _, _) = in_memory_state();
        let category = state
            .categories
            .create_category(CreateCategoryRequest {
                name: Some("Drinks".into()),
                image: None,
            })
            .await
            .expect("category created");
        state
            .lifecycle
            .create_question(CreateQuestionRequest {
                owner: UserId::random(),
                category_id: category.id(),
                text: "Tea or coffee?".into(),
                choice_texts: vec!["Tea".into(), "Coffee".into()],
            })
            .await
            .expect("question created");
        let app = actix_test::init_service(test_app(state)).await;

        for (uri, expected) in [
            ("/api/v1/categories/Drinks/polls", 1),
            ("/api/v1/categories/Games/polls", 0),
        ] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri(uri).to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
            let listed: Value = actix_test::read_body_json(res).await;
            assert_eq!(listed.as_array().map(Vec::len), Some(expected), "{uri}");
        }
    }

    #[actix_web::test]
    async fn storage_outage_surfaces_as_service_unavailable() {
        let mut polls = MockPollQuery::new();
        polls
            .expect_list_categories()
            .returning(|| Err(Error::service_unavailable("category repository unavailable")));
        let state = HttpState {
            polls: Arc::new(polls),
            ..HttpState::default()
        };
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/categories")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "service_unavailable");
    }
}
