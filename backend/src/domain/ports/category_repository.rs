//! Port for category storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::polls::{Category, CategoryName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
        /// Another category already uses this name.
        DuplicateName { name: String } =>
            "category {name} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, newest first (ties broken by name).
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    async fn find_category(&self, id: &Uuid) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Exact, case-sensitive match on the category name.
    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Store a category; the name must be unique.
    async fn insert_category(&self, category: &Category) -> Result<(), CategoryRepositoryError>;
}

/// Fixture implementation for wiring without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_category(
        &self,
        _id: &Uuid,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn find_category_by_name(
        &self,
        _name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(None)
    }

    async fn insert_category(&self, _category: &Category) -> Result<(), CategoryRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lists_nothing() {
        let listed = FixtureCategoryRepository
            .list_categories()
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[rstest]
    fn duplicate_name_formats_message() {
        assert_eq!(
            CategoryRepositoryError::duplicate_name("Games").to_string(),
            "category Games already exists"
        );
    }
}
