//! Poll categories.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::PollValidationError;

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX: usize = 30;

/// Unique, non-blank category name. Stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PollValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PollValidationError::EmptyCategoryName);
        }
        if trimmed.chars().count() > CATEGORY_NAME_MAX {
            return Err(PollValidationError::CategoryNameTooLong {
                max: CATEGORY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grouping for questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Uuid,
    name: CategoryName,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        id: Uuid,
        name: CategoryName,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let image = image.filter(|value| !value.trim().is_empty());
        Self {
            id,
            name,
            image,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Optional image reference (a path or URL; never the bytes).
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
