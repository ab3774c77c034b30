//! HTTP inbound adapter exposing REST endpoints.

pub mod categories;
pub mod error;
pub mod health;
pub mod polls;
pub mod polls_dto;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;
use serde_json::json;

pub use error::ApiResult;

use crate::domain::Error;

/// JSON extractor settings shared by every endpoint.
///
/// Bodies that fail to parse are answered with the standard error payload
/// instead of Actix's plain-text rejection.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("request body is not valid JSON: {err}"))
            .with_details(json!({ "code": "invalid_json" }))
            .into()
    })
}

/// Register every `/api/v1` endpoint on a scope.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .app_data(json_config())
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(polls::list_polls)
        .service(polls::create_poll)
        .service(polls::poll_results)
        .service(polls::get_poll)
        .service(polls::edit_poll)
        .service(polls::delete_poll)
        .service(polls::cast_vote)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::list_category_polls)
}
