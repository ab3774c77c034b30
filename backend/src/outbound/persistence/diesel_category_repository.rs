//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::polls::{Category, CategoryName};
use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};

use super::diesel_helpers::{DbFailure, classify_diesel_error, constraints, pool_error_message};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel-backed implementation of the category repository port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    CategoryRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: DbFailure, name: Option<&str>) -> CategoryRepositoryError {
    match (failure, name) {
        (DbFailure::Connection(message), _) => CategoryRepositoryError::connection(message),
        (failure, Some(name)) if failure.violates_unique(constraints::CATEGORY_NAME_UNIQUE) => {
            CategoryRepositoryError::duplicate_name(name)
        }
        (failure, _) => CategoryRepositoryError::query(failure.into_message()),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    map_failure(classify_diesel_error(error), None)
}

fn category_from_row(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    let name = CategoryName::new(&row.category_name).map_err(|err| {
        CategoryRepositoryError::query(format!("stored category {} is invalid: {err}", row.id))
    })?;
    Ok(Category::new(row.id, name, row.img, row.created_at))
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by((categories::created_at.desc(), categories::category_name.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(category_from_row).collect()
    }

    async fn find_category(&self, id: &Uuid) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .filter(categories::id.eq(*id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(category_from_row).transpose()
    }

    async fn find_category_by_name(
        &self,
        name: &CategoryName,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .filter(categories::category_name.eq(name.as_str()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(category_from_row).transpose()
    }

    async fn insert_category(&self, category: &Category) -> Result<(), CategoryRepositoryError> {
        let row = NewCategoryRow {
            id: category.id(),
            category_name: category.name().as_str(),
            img: category.image(),
            created_at: category.created_at(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(categories::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(classify_diesel_error(err), Some(row.category_name)))
    }
}
