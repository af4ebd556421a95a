//! `SeaORM` implementation of the `CategoryService` trait.

use async_trait::async_trait;

use crate::db::{CategoryPatch, NewCategory, Store};
use crate::entities::categories;
use crate::services::category_service::{
    CategoryError, CategoryService, CreateCategory, UpdateCategory,
};

pub struct SeaOrmCategoryService {
    store: Store,
}

impl SeaOrmCategoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CategoryService for SeaOrmCategoryService {
    async fn create_category(
        &self,
        owner_id: i32,
        request: CreateCategory,
    ) -> Result<categories::Model, CategoryError> {
        if self
            .store
            .category_name_taken(owner_id, &request.name, None)
            .await?
        {
            return Err(CategoryError::NameTaken);
        }

        let category = self
            .store
            .create_category(
                owner_id,
                NewCategory {
                    name: request.name,
                    description: request.description,
                },
            )
            .await?;

        Ok(category)
    }

    async fn list_categories(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(self.store.list_categories(owner_id, skip, limit).await?)
    }

    async fn get_category(
        &self,
        owner_id: i32,
        category_id: i32,
    ) -> Result<categories::Model, CategoryError> {
        self.store
            .get_category(owner_id, category_id)
            .await?
            .ok_or(CategoryError::NotFound)
    }

    async fn update_category(
        &self,
        owner_id: i32,
        category_id: i32,
        request: UpdateCategory,
    ) -> Result<categories::Model, CategoryError> {
        if let Some(name) = &request.name {
            if self
                .store
                .category_name_taken(owner_id, name, Some(category_id))
                .await?
            {
                return Err(CategoryError::NameTaken);
            }
        }

        self.store
            .update_category(
                owner_id,
                category_id,
                CategoryPatch {
                    name: request.name,
                    description: request.description,
                },
            )
            .await?
            .ok_or(CategoryError::NotFound)
    }

    async fn delete_category(
        &self,
        owner_id: i32,
        category_id: i32,
    ) -> Result<(), CategoryError> {
        let deleted = self.store.delete_category(owner_id, category_id).await?;
        if deleted {
            Ok(())
        } else {
            Err(CategoryError::NotFound)
        }
    }
}
