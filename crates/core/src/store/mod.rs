//! The remote recipe store seen by the rest of the application.
//!
//! Every operation is scoped by the owner it is called for; no
//! implementation may return or touch another owner's records.

pub mod memory;

use async_trait::async_trait;

use crate::category::CategoryFilter;
use crate::error::CoreError;
use crate::recipe::{RecipeFields, RecipeRecord};
use crate::types::{OwnerId, RecipeId};

pub use memory::MemoryRecipeStore;

/// Document store holding one collection of recipes per owner.
///
/// Result ordering of [`list`](RecipeStore::list) is implementation-defined.
/// Writes are atomic; callers do not attempt compensation on failure.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Every record owned by `owner`, or only those whose category equals
    /// the filter label.
    async fn list(
        &self,
        owner: OwnerId,
        filter: &CategoryFilter,
    ) -> Result<Vec<RecipeRecord>, CoreError>;

    /// A single owned record, `None` when missing or owned by someone else.
    async fn get(&self, owner: OwnerId, id: RecipeId) -> Result<Option<RecipeRecord>, CoreError>;

    /// Persist a new record under a freshly assigned id.
    async fn create(&self, owner: OwnerId, fields: RecipeFields)
        -> Result<RecipeRecord, CoreError>;

    /// Replace the fields of an existing owned record.
    ///
    /// Fails with [`CoreError::NotFound`] when the record does not exist or
    /// belongs to another owner.
    async fn update(
        &self,
        owner: OwnerId,
        id: RecipeId,
        fields: RecipeFields,
    ) -> Result<RecipeRecord, CoreError>;

    /// Remove an owned record. Deleting a missing record is
    /// [`CoreError::NotFound`], not a no-op.
    async fn delete(&self, owner: OwnerId, id: RecipeId) -> Result<(), CoreError>;
}
