//! Repository for the `recipes` table.
//!
//! Every query carries the owner id in its `WHERE` clause.

use recipebook_core::recipe::RecipeFields;
use recipebook_core::types::{OwnerId, RecipeId};
use sqlx::PgPool;

use crate::models::recipe::RecipeRow;

/// Column list for recipes queries.
const COLUMNS: &str =
    "id, owner_id, title, ingredient, directions, image, category, created_at, updated_at";

/// Provides owner-scoped CRUD operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    /// List an owner's recipes in insertion order, optionally restricted to
    /// one category.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: OwnerId,
        category: Option<&str>,
    ) -> Result<Vec<RecipeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipes
             WHERE owner_id = $1 AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(owner_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Find an owned recipe by id.
    pub async fn find(
        pool: &PgPool,
        owner_id: OwnerId,
        id: RecipeId,
    ) -> Result<Option<RecipeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE owner_id = $1 AND id = $2");
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a recipe under a caller-assigned id, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: OwnerId,
        id: RecipeId,
        input: &RecipeFields,
    ) -> Result<RecipeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipes (id, owner_id, title, ingredient, directions, image, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.ingredient)
            .bind(&input.directions)
            .bind(&input.image)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// Replace every mutable field of an owned recipe.
    ///
    /// Returns `None` when no row matches both owner and id.
    pub async fn update(
        pool: &PgPool,
        owner_id: OwnerId,
        id: RecipeId,
        input: &RecipeFields,
    ) -> Result<Option<RecipeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE recipes SET
                title = $3,
                ingredient = $4,
                directions = $5,
                image = $6,
                category = $7,
                updated_at = now()
             WHERE owner_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecipeRow>(&query)
            .bind(owner_id)
            .bind(id)
            .bind(&input.title)
            .bind(&input.ingredient)
            .bind(&input.directions)
            .bind(&input.image)
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owned recipe. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, owner_id: OwnerId, id: RecipeId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
