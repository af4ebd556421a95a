use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{categories, tasks};

pub mod migrator;
pub mod repositories;

pub use repositories::category::{CategoryPatch, NewCategory};
pub use repositories::task::{NewTask, TaskPatch};
pub use repositories::user::{NewUser, User, UserPatch};

/// Thin facade over the connection pool and the per-table repositories.
///
/// Each call runs as its own bounded unit of work; nothing is cached across
/// requests.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self, skip: u64, limit: u64) -> Result<Vec<User>> {
        self.user_repo().list(skip, limit).await
    }

    pub async fn username_taken(&self, username: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.user_repo().username_taken(username, exclude_id).await
    }

    pub async fn email_taken(&self, email: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.user_repo().email_taken(email, exclude_id).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn update_user(&self, id: i32, patch: UserPatch) -> Result<Option<User>> {
        self.user_repo().update(id, patch).await
    }

    pub async fn verify_user_credentials(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn record_user_login(&self, username: &str) -> Result<()> {
        self.user_repo().record_login(username).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // ========== Task Repository Methods ==========

    pub async fn create_task(&self, owner_id: i32, new_task: NewTask) -> Result<tasks::Model> {
        self.task_repo().create(owner_id, new_task).await
    }

    pub async fn list_tasks(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<tasks::Model>> {
        self.task_repo().list(owner_id, skip, limit).await
    }

    pub async fn get_task(&self, owner_id: i32, task_id: i32) -> Result<Option<tasks::Model>> {
        self.task_repo().get(owner_id, task_id).await
    }

    pub async fn update_task(
        &self,
        owner_id: i32,
        task_id: i32,
        patch: TaskPatch,
    ) -> Result<Option<tasks::Model>> {
        self.task_repo().update(owner_id, task_id, patch).await
    }

    pub async fn delete_task(&self, owner_id: i32, task_id: i32) -> Result<bool> {
        self.task_repo().delete(owner_id, task_id).await
    }

    pub async fn count_tasks_for_owner(&self, owner_id: i32) -> Result<u64> {
        self.task_repo().count_for_owner(owner_id).await
    }

    // ========== Category Repository Methods ==========

    pub async fn create_category(
        &self,
        owner_id: i32,
        new_category: NewCategory,
    ) -> Result<categories::Model> {
        self.category_repo().create(owner_id, new_category).await
    }

    pub async fn list_categories(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<categories::Model>> {
        self.category_repo().list(owner_id, skip, limit).await
    }

    pub async fn get_category(
        &self,
        owner_id: i32,
        category_id: i32,
    ) -> Result<Option<categories::Model>> {
        self.category_repo().get(owner_id, category_id).await
    }

    pub async fn category_name_taken(
        &self,
        owner_id: i32,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.category_repo()
            .name_taken(owner_id, name, exclude_id)
            .await
    }

    pub async fn update_category(
        &self,
        owner_id: i32,
        category_id: i32,
        patch: CategoryPatch,
    ) -> Result<Option<categories::Model>> {
        self.category_repo()
            .update(owner_id, category_id, patch)
            .await
    }

    pub async fn delete_category(&self, owner_id: i32, category_id: i32) -> Result<bool> {
        self.category_repo().delete(owner_id, category_id).await
    }

    pub async fn count_categories_for_owner(&self, owner_id: i32) -> Result<u64> {
        self.category_repo().count_for_owner(owner_id).await
    }
}
