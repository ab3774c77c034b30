//! Driving port for creating categories.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::polls::{Category, CategoryName};

/// Raw category form; `name` is optional so a missing value is reported as
/// a field error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryCommand: Send + Sync {
    /// Create a category.
    ///
    /// Fails with `invalid_request` carrying `{errors: [{field, code,
    /// message}]}` for every invalid or duplicate field.
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error>;
}

/// Validates the name and echoes a category without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryCommand;

#[async_trait]
impl CategoryCommand for FixtureCategoryCommand {
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error> {
        let name = CategoryName::new(request.name.unwrap_or_default())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Category::new(Uuid::new_v4(), name, request.image, Utc::now()))
    }
}
