//! Category creation with field-level error reporting.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::polls::{Category, CategoryName};
use crate::domain::ports::{
    CategoryCommand, CategoryRepository, CategoryRepositoryError, CreateCategoryRequest,
};
use crate::domain::service_support::map_category_repository_error;

/// One failed category field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldIssue {
    field: &'static str,
    code: &'static str,
    message: String,
}

fn field_errors(issues: &[FieldIssue]) -> Error {
    let errors: Vec<_> = issues
        .iter()
        .map(|issue| {
            json!({
                "field": issue.field,
                "code": issue.code,
                "message": issue.message,
            })
        })
        .collect();
    Error::invalid_request("category is invalid").with_details(json!({ "errors": errors }))
}

/// Service implementing [`CategoryCommand`].
#[derive(Clone)]
pub struct CategoryService<C> {
    categories: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CategoryService<C> {
    pub fn new(categories: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { categories, clock }
    }
}

impl<C> CategoryService<C>
where
    C: CategoryRepository,
{
    async fn name_taken(&self, name: &CategoryName) -> Result<bool, Error> {
        self.categories
            .find_category_by_name(name)
            .await
            .map(|found| found.is_some())
            .map_err(map_category_repository_error)
    }
}

#[async_trait]
impl<C> CategoryCommand for CategoryService<C>
where
    C: CategoryRepository,
{
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, Error> {
        let CreateCategoryRequest { name, image } = request;

        let name = match name {
            None => Err(FieldIssue {
                field: "category_name",
                code: "required",
                message: "This field is required.".to_owned(),
            }),
            Some(raw) => CategoryName::new(raw).map_err(|err| FieldIssue {
                field: err.field(),
                code: err.code(),
                message: err.to_string(),
            }),
        };
        let name = match name {
            Ok(name) => name,
            Err(issue) => return Err(field_errors(&[issue])),
        };

        let unique_issue = || FieldIssue {
            field: "category_name",
            code: "unique",
            message: "category with this category name already exists.".to_owned(),
        };
        if self.name_taken(&name).await? {
            return Err(field_errors(&[unique_issue()]));
        }

        let category = Category::new(Uuid::new_v4(), name, image, self.clock.utc());
        match self.categories.insert_category(&category).await {
            Ok(()) => {}
            // Lost a race with a concurrent insert of the same name.
            Err(CategoryRepositoryError::DuplicateName { .. }) => {
                return Err(field_errors(&[unique_issue()]));
            }
            Err(err) => return Err(map_category_repository_error(err)),
        }

        info!(category_id = %category.id(), name = %category.name(), "category created");
        Ok(category)
    }
}
