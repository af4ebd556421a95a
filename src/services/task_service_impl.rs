//! `SeaORM` implementation of the `TaskService` trait.

use async_trait::async_trait;

use crate::db::{NewTask, Store, TaskPatch};
use crate::entities::tasks;
use crate::services::task_service::{CreateTask, TaskError, TaskService, UpdateTask};

pub struct SeaOrmTaskService {
    store: Store,
}

impl SeaOrmTaskService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// A category reference is only valid if the same owner holds it.
    async fn check_category(&self, owner_id: i32, category_id: i32) -> Result<(), TaskError> {
        let exists = self
            .store
            .get_category(owner_id, category_id)
            .await?
            .is_some();

        if exists {
            Ok(())
        } else {
            Err(TaskError::CategoryNotFound)
        }
    }
}

#[async_trait]
impl TaskService for SeaOrmTaskService {
    async fn create_task(
        &self,
        owner_id: i32,
        request: CreateTask,
    ) -> Result<tasks::Model, TaskError> {
        if let Some(category_id) = request.category_id {
            self.check_category(owner_id, category_id).await?;
        }

        let task = self
            .store
            .create_task(
                owner_id,
                NewTask {
                    title: request.title,
                    description: request.description,
                    due_date: request.due_date,
                    category_id: request.category_id,
                },
            )
            .await?;

        Ok(task)
    }

    async fn list_tasks(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<tasks::Model>, TaskError> {
        Ok(self.store.list_tasks(owner_id, skip, limit).await?)
    }

    async fn get_task(&self, owner_id: i32, task_id: i32) -> Result<tasks::Model, TaskError> {
        self.store
            .get_task(owner_id, task_id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        request: UpdateTask,
    ) -> Result<tasks::Model, TaskError> {
        if let Some(category_id) = request.category_id {
            self.check_category(owner_id, category_id).await?;
        }

        self.store
            .update_task(
                owner_id,
                task_id,
                TaskPatch {
                    title: request.title,
                    description: request.description,
                    completed: request.completed,
                    due_date: request.due_date,
                    category_id: request.category_id,
                },
            )
            .await?
            .ok_or(TaskError::NotFound)
    }

    async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<(), TaskError> {
        let deleted = self.store.delete_task(owner_id, task_id).await?;
        if deleted {
            Ok(())
        } else {
            Err(TaskError::NotFound)
        }
    }
}
