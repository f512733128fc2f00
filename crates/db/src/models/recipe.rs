//! Recipe row model.

use recipebook_core::recipe::RecipeRecord;
use recipebook_core::types::{OwnerId, RecipeId, Timestamp};
use sqlx::FromRow;

/// A row from the `recipes` table.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: RecipeId,
    pub owner_id: OwnerId,
    pub title: String,
    pub ingredient: String,
    pub directions: Vec<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<RecipeRow> for RecipeRecord {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            ingredient: row.ingredient,
            directions: row.directions,
            image: row.image,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
