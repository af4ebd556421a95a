use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::tasks;

#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

/// All reads and writes are filtered by `owner_id`; a task belonging to a
/// different user is indistinguishable from a missing one.
pub struct TaskRepository {
    conn: DatabaseConnection,
}

impl TaskRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, owner_id: i32, new_task: NewTask) -> Result<tasks::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = tasks::ActiveModel {
            id: NotSet,
            title: Set(new_task.title),
            description: Set(new_task.description),
            completed: Set(false),
            due_date: Set(new_task.due_date),
            category_id: Set(new_task.category_id),
            owner_id: Set(owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active.insert(&self.conn).await.context("Failed to insert task")
    }

    pub async fn list(&self, owner_id: i32, skip: u64, limit: u64) -> Result<Vec<tasks::Model>> {
        tasks::Entity::find()
            .filter(tasks::Column::OwnerId.eq(owner_id))
            .order_by_asc(tasks::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")
    }

    pub async fn get(&self, owner_id: i32, task_id: i32) -> Result<Option<tasks::Model>> {
        tasks::Entity::find_by_id(task_id)
            .filter(tasks::Column::OwnerId.eq(owner_id))
            .one(&self.conn)
            .await
            .context("Failed to query task")
    }

    pub async fn update(
        &self,
        owner_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<tasks::Model>> {
        let Some(existing) = self.get(owner_id, task_id).await? else {
            return Ok(None);
        };

        let mut active: tasks::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(completed) = patch.completed {
            active.completed = Set(completed);
        }
        if let Some(due_date) = patch.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(Some(category_id));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update task")?;

        Ok(Some(model))
    }

    pub async fn delete(&self, owner_id: i32, task_id: i32) -> Result<bool> {
        let result = tasks::Entity::delete_many()
            .filter(tasks::Column::Id.eq(task_id))
            .filter(tasks::Column::OwnerId.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete task")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_for_owner(&self, owner_id: i32) -> Result<u64> {
        tasks::Entity::find()
            .filter(tasks::Column::OwnerId.eq(owner_id))
            .count(&self.conn)
            .await
            .context("Failed to count tasks")
    }
}
