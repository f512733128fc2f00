//! [`RecipeStore`] backed by the `recipes` table.

use async_trait::async_trait;
use recipebook_core::category::CategoryFilter;
use recipebook_core::error::CoreError;
use recipebook_core::recipe::{RecipeFields, RecipeRecord};
use recipebook_core::store::RecipeStore;
use recipebook_core::types::{OwnerId, RecipeId};
use uuid::Uuid;

use crate::error::map_sqlx_error;
use crate::repositories::RecipeRepo;
use crate::DbPool;

const ENTITY: &str = "recipe";

/// PostgreSQL recipe store. Results are ordered by creation time.
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list(
        &self,
        owner: OwnerId,
        filter: &CategoryFilter,
    ) -> Result<Vec<RecipeRecord>, CoreError> {
        let rows = RecipeRepo::list_for_owner(&self.pool, owner, filter.label())
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?;
        tracing::debug!(owner_id = %owner, category = %filter, count = rows.len(), "Listed recipes");
        Ok(rows.into_iter().map(RecipeRecord::from).collect())
    }

    async fn get(&self, owner: OwnerId, id: RecipeId) -> Result<Option<RecipeRecord>, CoreError> {
        let row = RecipeRepo::find(&self.pool, owner, id)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?;
        Ok(row.map(RecipeRecord::from))
    }

    async fn create(
        &self,
        owner: OwnerId,
        fields: RecipeFields,
    ) -> Result<RecipeRecord, CoreError> {
        let row = RecipeRepo::create(&self.pool, owner, Uuid::now_v7(), &fields)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?;
        tracing::info!(owner_id = %owner, recipe_id = %row.id, "Recipe created");
        Ok(row.into())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: RecipeId,
        fields: RecipeFields,
    ) -> Result<RecipeRecord, CoreError> {
        let row = RecipeRepo::update(&self.pool, owner, id, &fields)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?
            .ok_or_else(|| CoreError::recipe_not_found(id))?;
        tracing::info!(owner_id = %owner, recipe_id = %id, "Recipe updated");
        Ok(row.into())
    }

    async fn delete(&self, owner: OwnerId, id: RecipeId) -> Result<(), CoreError> {
        let deleted = RecipeRepo::delete(&self.pool, owner, id)
            .await
            .map_err(|e| map_sqlx_error(e, ENTITY))?;
        if !deleted {
            return Err(CoreError::recipe_not_found(id));
        }
        tracing::info!(owner_id = %owner, recipe_id = %id, "Recipe deleted");
        Ok(())
    }
}
