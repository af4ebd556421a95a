//! Domain service for task management.
//!
//! Every operation is scoped to one owner; records belonging to anyone else
//! are reported as missing.

use thiserror::Error;

use crate::entities::tasks;

/// Errors specific to task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

/// Domain service trait for tasks.
#[async_trait::async_trait]
pub trait TaskService: Send + Sync {
    /// Creates a task for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::CategoryNotFound`] when `category_id` names a
    /// category the owner does not hold.
    async fn create_task(&self, owner_id: i32, request: CreateTask)
    -> Result<tasks::Model, TaskError>;

    async fn list_tasks(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<tasks::Model>, TaskError>;

    async fn get_task(&self, owner_id: i32, task_id: i32) -> Result<tasks::Model, TaskError>;

    async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        request: UpdateTask,
    ) -> Result<tasks::Model, TaskError>;

    async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<(), TaskError>;
}
