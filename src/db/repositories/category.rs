use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, Value,
};

use crate::entities::{categories, tasks};

#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Owner-scoped like [`super::task::TaskRepository`].
pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        owner_id: i32,
        new_category: NewCategory,
    ) -> Result<categories::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = categories::ActiveModel {
            id: NotSet,
            name: Set(new_category.name),
            description: Set(new_category.description),
            owner_id: Set(owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert category")
    }

    pub async fn list(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<categories::Model>> {
        categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(owner_id))
            .order_by_asc(categories::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list categories")
    }

    pub async fn get(&self, owner_id: i32, category_id: i32) -> Result<Option<categories::Model>> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::OwnerId.eq(owner_id))
            .one(&self.conn)
            .await
            .context("Failed to query category")
    }

    pub async fn name_taken(
        &self,
        owner_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(owner_id))
            .filter(categories::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(categories::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check category name uniqueness")?;

        Ok(count > 0)
    }

    pub async fn update(
        &self,
        owner_id: i32,
        category_id: i32,
        patch: CategoryPatch,
    ) -> Result<Option<categories::Model>> {
        let Some(existing) = self.get(owner_id, category_id).await? else {
            return Ok(None);
        };

        let mut active: categories::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update category")?;

        Ok(Some(model))
    }

    /// Delete a category, detaching any tasks that reference it.
    ///
    /// Tasks survive the deletion with `category_id` cleared; both steps run
    /// in one transaction.
    pub async fn delete(&self, owner_id: i32, category_id: i32) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open delete transaction")?;

        let result = categories::Entity::delete_many()
            .filter(categories::Column::Id.eq(category_id))
            .filter(categories::Column::OwnerId.eq(owner_id))
            .exec(&txn)
            .await
            .context("Failed to delete category")?;

        if result.rows_affected == 0 {
            txn.rollback().await.ok();
            return Ok(false);
        }

        tasks::Entity::update_many()
            .col_expr(tasks::Column::CategoryId, Expr::value(Value::Int(None)))
            .filter(tasks::Column::CategoryId.eq(category_id))
            .exec(&txn)
            .await
            .context("Failed to detach tasks from category")?;

        txn.commit()
            .await
            .context("Failed to commit category delete")?;

        Ok(true)
    }

    pub async fn count_for_owner(&self, owner_id: i32) -> Result<u64> {
        categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(owner_id))
            .count(&self.conn)
            .await
            .context("Failed to count categories")
    }
}
