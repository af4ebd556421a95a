//! Domain service for task categories.

use thiserror::Error;

use crate::entities::categories;

/// Errors specific to category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,

    #[error("Category name already in use")]
    NameTaken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for CategoryError {
    fn from(err: anyhow::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("UNIQUE") {
            Self::NameTaken
        } else {
            Self::Internal(msg)
        }
    }
}

#[derive(Debug)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Domain service trait for categories. Owner-scoped like
/// [`super::task_service::TaskService`].
#[async_trait::async_trait]
pub trait CategoryService: Send + Sync {
    /// Creates a category for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::NameTaken`] when the owner already has a
    /// category with the same name.
    async fn create_category(
        &self,
        owner_id: i32,
        request: CreateCategory,
    ) -> Result<categories::Model, CategoryError>;

    async fn list_categories(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<categories::Model>, CategoryError>;

    async fn get_category(
        &self,
        owner_id: i32,
        category_id: i32,
    ) -> Result<categories::Model, CategoryError>;

    async fn update_category(
        &self,
        owner_id: i32,
        category_id: i32,
        request: UpdateCategory,
    ) -> Result<categories::Model, CategoryError>;

    /// Deletes a category; tasks referencing it survive with the reference
    /// cleared.
    async fn delete_category(&self, owner_id: i32, category_id: i32)
    -> Result<(), CategoryError>;
}
