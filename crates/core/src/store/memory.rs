//! In-process [`RecipeStore`] used by tests and offline sessions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::RecipeStore;
use crate::category::CategoryFilter;
use crate::error::CoreError;
use crate::recipe::{RecipeFields, RecipeRecord};
use crate::types::{OwnerId, RecipeId};

/// Insertion-ordered store kept in memory.
///
/// [`set_available`](Self::set_available) simulates a network outage: while
/// unavailable, every operation fails with [`CoreError::StoreUnavailable`].
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    records: RwLock<Vec<RecipeRecord>>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// How many times [`RecipeStore::list`] has been called.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::StoreUnavailable("store is offline".into()));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<RecipeRecord>>, CoreError> {
        self.records
            .read()
            .map_err(|_| CoreError::Internal("recipe store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<RecipeRecord>>, CoreError> {
        self.records
            .write()
            .map_err(|_| CoreError::Internal("recipe store lock poisoned".into()))
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list(
        &self,
        owner: OwnerId,
        filter: &CategoryFilter,
    ) -> Result<Vec<RecipeRecord>, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .read()?
            .iter()
            .filter(|r| r.owner_id == owner && filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get(&self, owner: OwnerId, id: RecipeId) -> Result<Option<RecipeRecord>, CoreError> {
        self.check_available()?;
        Ok(self
            .read()?
            .iter()
            .find(|r| r.owner_id == owner && r.id == id)
            .cloned())
    }

    async fn create(
        &self,
        owner: OwnerId,
        fields: RecipeFields,
    ) -> Result<RecipeRecord, CoreError> {
        self.check_available()?;
        let record = RecipeRecord::from_fields(Uuid::now_v7(), owner, fields, Utc::now());
        self.write()?.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: RecipeId,
        fields: RecipeFields,
    ) -> Result<RecipeRecord, CoreError> {
        self.check_available()?;
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|r| r.owner_id == owner && r.id == id)
            .ok_or_else(|| CoreError::recipe_not_found(id))?;
        record.apply(fields, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, owner: OwnerId, id: RecipeId) -> Result<(), CoreError> {
        self.check_available()?;
        let mut records = self.write()?;
        let index = records
            .iter()
            .position(|r| r.owner_id == owner && r.id == id)
            .ok_or_else(|| CoreError::recipe_not_found(id))?;
        records.remove(index);
        Ok(())
    }
}
